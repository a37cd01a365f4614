//! Central assessment engine orchestrator.
//!
//! Coordinates signal analysis, plagiarism scanning, weighted scoring, and
//! feedback generation across a batch of submissions with bounded
//! parallelism.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::error::ConfigError;
use crate::feedback::generate_feedback;
use crate::model::{SignalSet, Submission, SubmissionBatch};
use crate::report::{AssessmentReport, BatchSummary};
use crate::results::AssessmentResult;
use crate::scoring::{combine_scores, score_all, ScoringConfig};
use crate::statistics::cohort_stats;
use crate::traits::{AnalyzeRequest, CodeAnalyzer, PlagiarismDetector, ScanRequest};

/// Configuration for the assessment engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum concurrent evaluations.
    pub parallelism: usize,
    /// Scoring weights and thresholds.
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Progress reporting trait for batch evaluation.
pub trait AssessmentObserver: Send + Sync {
    fn on_submission_start(&self, submission_id: &str, user_id: &str);
    fn on_submission_scored(&self, result: &AssessmentResult);
    fn on_batch_complete(&self, total: usize, passed: usize, elapsed: Duration);
}

/// No-op observer.
pub struct NoopObserver;

impl AssessmentObserver for NoopObserver {
    fn on_submission_start(&self, _: &str, _: &str) {}
    fn on_submission_scored(&self, _: &AssessmentResult) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// The central assessment engine.
pub struct AssessmentEngine {
    analyzer: Arc<dyn CodeAnalyzer>,
    detector: Arc<dyn PlagiarismDetector>,
    config: EngineConfig,
}

impl AssessmentEngine {
    /// Build an engine, validating the scoring configuration up front.
    ///
    /// A bad weight table or threshold is fatal here, before any scoring.
    pub fn new(
        analyzer: Arc<dyn CodeAnalyzer>,
        detector: Arc<dyn PlagiarismDetector>,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        if config.parallelism < 1 {
            return Err(ConfigError::Parallelism);
        }
        config.scoring.validate()?;
        Ok(Self {
            analyzer,
            detector,
            config,
        })
    }

    /// Evaluate a single submission.
    pub async fn evaluate(&self, submission: &Submission) -> AssessmentResult {
        self.evaluate_in_run(submission, Uuid::new_v4()).await
    }

    async fn evaluate_in_run(&self, submission: &Submission, run_id: Uuid) -> AssessmentResult {
        // Signals supplied with the submission win; otherwise derive them.
        // An analyzer failure degrades to an empty signal set so the
        // submission still gets a best-effort result.
        let signals: SignalSet = match &submission.signals {
            Some(signals) => signals.clone(),
            None => {
                let request = AnalyzeRequest {
                    submission_id: submission.id.clone(),
                    code: submission.code.clone(),
                };
                match self.analyzer.derive_signals(&request).await {
                    Ok(signals) => signals,
                    Err(e) => {
                        tracing::warn!(
                            submission = %submission.id,
                            analyzer = self.analyzer.name(),
                            error = %e,
                            "signal analysis failed, scoring with no signals"
                        );
                        SignalSet::default()
                    }
                }
            }
        };

        let scan = ScanRequest {
            submission_id: submission.id.clone(),
            code: submission.code.clone(),
            threshold: self.config.scoring.plagiarism_threshold,
        };
        let plagiarism = match self.detector.scan(&scan).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(
                    submission = %submission.id,
                    detector = self.detector.name(),
                    error = %e,
                    "plagiarism scan failed, defaulting to not detected"
                );
                None
            }
        };

        let category_scores = score_all(&signals);
        let (final_score, passed) =
            combine_scores(&category_scores, plagiarism.as_ref(), &self.config.scoring);
        let feedback = generate_feedback(
            &category_scores,
            &signals,
            plagiarism.as_ref(),
            final_score,
            passed,
        );

        AssessmentResult {
            submission_id: submission.id.clone(),
            user_id: submission.user_id.clone(),
            lab_id: submission.lab_id.clone(),
            category_scores,
            signals,
            plagiarism,
            final_score,
            passed,
            feedback,
            evaluated_at: chrono::Utc::now(),
            run_id,
        }
    }

    /// Evaluate every submission in a batch with bounded parallelism.
    pub async fn run_batch(
        &self,
        batch: &SubmissionBatch,
        observer: &dyn AssessmentObserver,
    ) -> AssessmentReport {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));

        let mut futures = FuturesUnordered::new();
        for submission in &batch.submissions {
            let semaphore = Arc::clone(&semaphore);
            futures.push(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                observer.on_submission_start(&submission.id, &submission.user_id);
                let result = self.evaluate_in_run(submission, run_id).await;
                observer.on_submission_scored(&result);
                result
            });
        }

        let mut results = Vec::with_capacity(batch.submissions.len());
        while let Some(result) = futures.next().await {
            results.push(result);
        }
        // Completion order is nondeterministic; reports are not.
        results.sort_by(|a, b| a.submission_id.cmp(&b.submission_id));

        let elapsed = start.elapsed();
        let passed = results.iter().filter(|r| r.passed).count();
        observer.on_batch_complete(results.len(), passed, elapsed);

        AssessmentReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            batch: BatchSummary {
                id: batch.id.clone(),
                name: batch.name.clone(),
                submission_count: batch.submissions.len(),
            },
            cohort: cohort_stats(&results),
            results,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}
