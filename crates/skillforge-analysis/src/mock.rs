//! Mock analyzers for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use skillforge_core::model::SignalSet;
use skillforge_core::plagiarism::{PlagiarismMatch, PlagiarismResult, METHOD_MULTI_FACTOR};
use skillforge_core::traits::{AnalyzeRequest, CodeAnalyzer, PlagiarismDetector, ScanRequest};

/// A mock analyzer returning a fixed signal set.
pub struct MockAnalyzer {
    signals: SignalSet,
    call_count: AtomicU32,
    last_request: Mutex<Option<AnalyzeRequest>>,
}

impl MockAnalyzer {
    /// Create a mock that always returns the given signals.
    pub fn with_signals(signals: SignalSet) -> Self {
        Self {
            signals,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this analyzer.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this analyzer.
    pub fn last_request(&self) -> Option<AnalyzeRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeAnalyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn derive_signals(&self, request: &AnalyzeRequest) -> anyhow::Result<SignalSet> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(self.signals.clone())
    }
}

/// A mock detector reporting a fixed similarity.
pub struct MockDetector {
    similarity: f64,
    call_count: AtomicU32,
}

impl MockDetector {
    /// Create a mock that always reports the given similarity.
    pub fn with_similarity(similarity: f64) -> Self {
        Self {
            similarity,
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of calls made to this detector.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PlagiarismDetector for MockDetector {
    fn name(&self) -> &str {
        "mock"
    }

    async fn scan(&self, request: &ScanRequest) -> anyhow::Result<PlagiarismResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let detected = self.similarity > request.threshold;
        Ok(PlagiarismResult {
            similarity: self.similarity,
            detected,
            method: METHOD_MULTI_FACTOR.to_string(),
            matches: if detected {
                vec![PlagiarismMatch {
                    source_ref: "mock-source".into(),
                    start_line: 1,
                    end_line: 1,
                    similarity: self.similarity,
                }]
            } else {
                Vec::new()
            },
        })
    }
}
