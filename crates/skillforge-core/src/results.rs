//! Assessment result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Category, SignalSet};
use crate::plagiarism::PlagiarismResult;
use crate::scoring::CategoryScore;

/// The complete evaluation of one submission.
///
/// Built once per evaluation and immutable afterwards; the feedback text is
/// a pure function of the other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub submission_id: String,
    pub user_id: String,
    pub lab_id: String,
    /// Scores for the categories that had signals, in report order.
    pub category_scores: Vec<CategoryScore>,
    /// The signals those scores were computed from.
    pub signals: SignalSet,
    /// Plagiarism verdict, when a scan ran.
    #[serde(default)]
    pub plagiarism: Option<PlagiarismResult>,
    /// Weighted final score after any plagiarism penalty.
    pub final_score: u32,
    pub passed: bool,
    /// Deterministic, human-readable feedback.
    pub feedback: String,
    pub evaluated_at: DateTime<Utc>,
    /// The batch run this result belongs to.
    pub run_id: Uuid,
}

impl AssessmentResult {
    /// The score for one category, if it was evaluated.
    pub fn score_for(&self, category: Category) -> Option<u32> {
        self.category_scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.value)
    }

    /// Whether the plagiarism scan flagged this submission.
    pub fn plagiarism_detected(&self) -> bool {
        self.plagiarism.as_ref().is_some_and(|p| p.detected)
    }
}
