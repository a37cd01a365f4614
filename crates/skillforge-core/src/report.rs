//! Assessment batch reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::AssessmentResult;
use crate::statistics::CohortStats;

/// A complete report over one evaluated batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the evaluated batch.
    pub batch: BatchSummary,
    /// Individual assessment results.
    pub results: Vec<AssessmentResult>,
    /// Aggregate statistics over the batch.
    pub cohort: CohortStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a submission batch (without the full submissions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub id: String,
    pub name: String,
    pub submission_count: usize,
}

impl AssessmentReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SignalSet;
    use crate::statistics::cohort_stats;

    fn make_report() -> AssessmentReport {
        let results = vec![AssessmentResult {
            submission_id: "sub-1".into(),
            user_id: "u-ada".into(),
            lab_id: "lab-payments".into(),
            category_scores: vec![],
            signals: SignalSet::default(),
            plagiarism: None,
            final_score: 82,
            passed: true,
            feedback: "## Assessment Summary\n".into(),
            evaluated_at: Utc::now(),
            run_id: Uuid::nil(),
        }];
        AssessmentReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            batch: BatchSummary {
                id: "batch-1".into(),
                name: "Test Batch".into(),
                submission_count: 1,
            },
            cohort: cohort_stats(&results),
            results,
            duration_ms: 12,
        }
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = AssessmentReport::load_json(&path).unwrap();

        assert_eq!(loaded.batch.id, "batch-1");
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].final_score, 82);
    }

    #[test]
    fn load_missing_file_errors() {
        let err = AssessmentReport::load_json(Path::new("no_such_report.json"));
        assert!(err.is_err());
    }
}
