//! Plagiarism verdict types and the similarity combiner.
//!
//! Detectors produce three independently bounded sub-scores; this module
//! owns the fixed weighting that turns them into one similarity figure and
//! a boolean verdict. The text heuristics themselves live in
//! `skillforge-analysis`.

use serde::{Deserialize, Serialize};

/// Analysis method recorded when a submission carries no code at all.
pub const METHOD_NO_CODE: &str = "NO_CODE";

/// Analysis method recorded for the standard three-factor scan.
pub const METHOD_MULTI_FACTOR: &str = "MULTI_FACTOR_ANALYSIS";

/// A region of the submission matching known material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlagiarismMatch {
    /// What the region matched (corpus entry, prior submission, ...).
    pub source_ref: String,
    /// 1-based first line of the matching region.
    pub start_line: u32,
    /// 1-based last line of the matching region.
    pub end_line: u32,
    pub similarity: f64,
}

/// The plagiarism verdict for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlagiarismResult {
    /// Combined similarity in `[0, 1]`.
    pub similarity: f64,
    pub detected: bool,
    pub method: String,
    /// Populated with at least one match whenever `detected` is true.
    #[serde(default)]
    pub matches: Vec<PlagiarismMatch>,
}

impl PlagiarismResult {
    /// Result for a submission with no code to analyze.
    pub fn no_code() -> Self {
        Self {
            similarity: 0.0,
            detected: false,
            method: METHOD_NO_CODE.to_string(),
            matches: Vec::new(),
        }
    }
}

/// The three sub-scores a detector derives from submission text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimilaritySignals {
    /// Structural similarity, capped so its weighted contribution to the
    /// total never exceeds 0.40.
    pub structural: f64,
    /// Suspicious-pattern similarity in `[0, 1]`.
    pub pattern: f64,
    /// Identifier/comment/string similarity in `[0, 1]`.
    pub semantic: f64,
}

/// Combine the three sub-scores into one similarity figure.
///
/// Structural similarity carries half the total weight but contributes at
/// most 0.40; pattern and semantic carry 0.3 and 0.2.
pub fn combine_similarity(signals: SimilaritySignals) -> f64 {
    let structural = signals.structural.clamp(0.0, 0.80);
    let pattern = signals.pattern.clamp(0.0, 1.0);
    let semantic = signals.semantic.clamp(0.0, 1.0);

    (structural * 0.5 + pattern * 0.3 + semantic * 0.2).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_code_result_shape() {
        let result = PlagiarismResult::no_code();
        assert_eq!(result.similarity, 0.0);
        assert!(!result.detected);
        assert_eq!(result.method, METHOD_NO_CODE);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn combine_weights_sub_scores() {
        let similarity = combine_similarity(SimilaritySignals {
            structural: 0.60,
            pattern: 1.0,
            semantic: 1.0,
        });
        // 0.60*0.5 + 1.0*0.3 + 1.0*0.2 = 0.80
        assert!((similarity - 0.80).abs() < 1e-9);
    }

    #[test]
    fn combine_caps_structural_contribution() {
        let capped = combine_similarity(SimilaritySignals {
            structural: 5.0,
            pattern: 0.0,
            semantic: 0.0,
        });
        assert!((capped - 0.40).abs() < 1e-9);
    }

    #[test]
    fn combine_never_leaves_unit_interval() {
        let similarity = combine_similarity(SimilaritySignals {
            structural: 100.0,
            pattern: 100.0,
            semantic: 100.0,
        });
        assert!((0.0..=1.0).contains(&similarity));
    }
}
