//! Core trait definitions for analysis collaborators.
//!
//! These async traits are implemented by the `skillforge-analysis` crate.
//! They are the seam where real static-analysis pipelines plug in; tests
//! substitute deterministic doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::SignalSet;
use crate::plagiarism::PlagiarismResult;

/// Trait for collaborators that derive category signals from source text.
#[async_trait]
pub trait CodeAnalyzer: Send + Sync {
    /// Human-readable analyzer name (e.g. "static").
    fn name(&self) -> &str;

    /// Derive per-category raw signals from a submission's source.
    async fn derive_signals(&self, request: &AnalyzeRequest) -> anyhow::Result<SignalSet>;
}

/// Request to derive signals from a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Submission the code belongs to, for log correlation.
    pub submission_id: String,
    /// Raw source text.
    pub code: String,
}

/// Trait for collaborators that scan a submission for plagiarism.
#[async_trait]
pub trait PlagiarismDetector: Send + Sync {
    /// Human-readable detector name.
    fn name(&self) -> &str;

    /// Scan submission source for similarity to known material.
    async fn scan(&self, request: &ScanRequest) -> anyhow::Result<PlagiarismResult>;
}

/// Request to scan a submission for plagiarism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Submission the code belongs to, for log correlation.
    pub submission_id: String,
    /// Raw source text.
    pub code: String,
    /// Similarity above which the verdict flips to detected.
    pub threshold: f64,
}
