//! skillforge-analysis — static-analysis collaborators.
//!
//! Implements the `CodeAnalyzer` and `PlagiarismDetector` traits with
//! deterministic text heuristics: the same source always yields the same
//! signals. Execution-backed signals supplied with a submission always take
//! precedence over anything derived here.

pub mod heuristics;
pub mod mock;
pub mod plagiarism;

pub use heuristics::StaticAnalyzer;
pub use mock::{MockAnalyzer, MockDetector};
pub use plagiarism::SimilarityScanner;
