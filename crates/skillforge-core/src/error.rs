//! Configuration error types.
//!
//! Scoring thresholds and the category weight table are validated once at
//! engine construction. A bad configuration is fatal before any scoring
//! occurs; nothing in the core retries or degrades around it.

use thiserror::Error;

use crate::model::Category;

/// Errors raised when validating scoring or progress configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The five category weights must sum to exactly 1.0.
    #[error("category weights sum to {actual:.4}, expected 1.0")]
    WeightSum { actual: f64 },

    /// An individual weight fell outside the unit interval.
    #[error("weight for {category} is {value}, must be within [0.0, 1.0]")]
    WeightRange { category: Category, value: f64 },

    /// The pass threshold must be a score on the 0-100 scale.
    #[error("pass threshold {0} is outside [0, 100]")]
    PassThreshold(u32),

    /// The plagiarism similarity threshold must be a ratio.
    #[error("plagiarism threshold {0} is outside [0.0, 1.0]")]
    PlagiarismThreshold(f64),

    /// The plagiarism penalty is subtracted from a 0-100 score.
    #[error("plagiarism penalty {0} is outside [0, 100]")]
    PlagiarismPenalty(u32),

    /// The mastery threshold is a score percentage.
    #[error("mastery threshold {0} is outside [0.0, 100.0]")]
    MasteryThreshold(f64),

    /// Batch evaluation needs at least one worker.
    #[error("parallelism must be at least 1")]
    Parallelism,
}
