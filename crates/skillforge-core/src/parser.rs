//! TOML input parsing.
//!
//! Loads submission batches, activity logs, and the engine configuration
//! from TOML files and directories, and validates them.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::EngineConfig;
use crate::error::ConfigError;
use crate::model::{
    ActivityEvent, ActivityKind, EntityKind, SignalSet, SkillTotals, Submission, SubmissionBatch,
};
use crate::progress::DEFAULT_MASTERY_THRESHOLD;
use crate::scoring::ScoringConfig;

// ---------------------------------------------------------------------------
// Submission batches
// ---------------------------------------------------------------------------

/// Intermediate TOML structure for batch files.
#[derive(Debug, Deserialize)]
struct TomlBatchFile {
    batch: TomlBatchHeader,
    #[serde(default)]
    submissions: Vec<TomlSubmission>,
}

#[derive(Debug, Deserialize)]
struct TomlBatchHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlSubmission {
    id: String,
    user: String,
    lab: String,
    #[serde(default)]
    skill: Option<String>,
    #[serde(default)]
    code: String,
    #[serde(default)]
    signals: Option<SignalSet>,
    submitted_at: DateTime<Utc>,
}

/// Parse a single TOML file into a `SubmissionBatch`.
pub fn parse_batch(path: &Path) -> Result<SubmissionBatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file: {}", path.display()))?;
    parse_batch_str(&content, path)
}

/// Parse a TOML string into a `SubmissionBatch` (useful for testing).
pub fn parse_batch_str(content: &str, source_path: &Path) -> Result<SubmissionBatch> {
    let parsed: TomlBatchFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let submissions = parsed
        .submissions
        .into_iter()
        .map(|s| Submission {
            id: s.id,
            user_id: s.user,
            lab_id: s.lab,
            skill_id: s.skill,
            code: s.code,
            signals: s.signals,
            submitted_at: s.submitted_at,
        })
        .collect();

    Ok(SubmissionBatch {
        id: parsed.batch.id,
        name: parsed.batch.name,
        description: parsed.batch.description,
        submissions,
    })
}

/// Recursively load all `.toml` batch files from a directory.
pub fn load_batch_directory(dir: &Path) -> Result<Vec<SubmissionBatch>> {
    let mut batches = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            batches.extend(load_batch_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_batch(&path) {
                Ok(batch) => batches.push(batch),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(batches)
}

// ---------------------------------------------------------------------------
// Activity logs
// ---------------------------------------------------------------------------

/// A parsed activity log: events plus the catalog context needed to apply
/// them (skill totals, display names).
#[derive(Debug, Clone)]
pub struct ActivityLog {
    pub id: String,
    pub name: String,
    /// Optional user id to display name mapping.
    pub user_names: HashMap<String, String>,
    /// Per-skill element totals from the content catalog.
    pub skill_totals: HashMap<String, SkillTotals>,
    pub events: Vec<ActivityEvent>,
}

#[derive(Debug, Deserialize)]
struct TomlActivityFile {
    log: TomlLogHeader,
    #[serde(default)]
    users: HashMap<String, String>,
    #[serde(default)]
    totals: HashMap<String, SkillTotals>,
    #[serde(default)]
    events: Vec<TomlEvent>,
}

#[derive(Debug, Deserialize)]
struct TomlLogHeader {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlEvent {
    /// Stable identity for deduplication; generated when omitted.
    #[serde(default)]
    id: Option<Uuid>,
    user: String,
    kind: ActivityKind,
    entity: String,
    entity_kind: EntityKind,
    #[serde(default)]
    skill: Option<String>,
    #[serde(default)]
    points: Option<u32>,
    #[serde(default)]
    time_spent_minutes: Option<u32>,
    timestamp: DateTime<Utc>,
}

/// Parse a single TOML file into an `ActivityLog`.
pub fn parse_activity_log(path: &Path) -> Result<ActivityLog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read activity log: {}", path.display()))?;
    parse_activity_log_str(&content, path)
}

/// Parse a TOML string into an `ActivityLog` (useful for testing).
pub fn parse_activity_log_str(content: &str, source_path: &Path) -> Result<ActivityLog> {
    let parsed: TomlActivityFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let events = parsed
        .events
        .into_iter()
        .map(|e| ActivityEvent {
            id: e.id.unwrap_or_else(Uuid::new_v4),
            user_id: e.user,
            kind: e.kind,
            entity_id: e.entity,
            entity_kind: e.entity_kind,
            skill_id: e.skill,
            points_earned: e.points,
            time_spent_minutes: e.time_spent_minutes,
            timestamp: e.timestamp,
        })
        .collect();

    Ok(ActivityLog {
        id: parsed.log.id,
        name: parsed.log.name,
        user_names: parsed.users,
        skill_totals: parsed.totals,
        events,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A warning from input validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The submission or event ID (if applicable).
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a submission batch for common issues.
pub fn validate_batch(batch: &SubmissionBatch) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = std::collections::HashSet::new();
    for submission in &batch.submissions {
        if !seen_ids.insert(&submission.id) {
            warnings.push(ValidationWarning {
                subject: Some(submission.id.clone()),
                message: format!("duplicate submission ID: {}", submission.id),
            });
        }
    }

    for submission in &batch.submissions {
        if submission.code.trim().is_empty() && submission.signals.is_none() {
            warnings.push(ValidationWarning {
                subject: Some(submission.id.clone()),
                message: "submission has neither code nor signals".into(),
            });
        } else if submission.code.trim().is_empty() {
            warnings.push(ValidationWarning {
                subject: Some(submission.id.clone()),
                message: "code is empty, plagiarism scan will report NO_CODE".into(),
            });
        }
    }

    warnings
}

/// Validate an activity log for common issues.
pub fn validate_activity_log(log: &ActivityLog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = std::collections::HashSet::new();
    for event in &log.events {
        if !seen_ids.insert(event.id) {
            warnings.push(ValidationWarning {
                subject: Some(event.id.to_string()),
                message: format!("duplicate event ID: {} (will be ignored on replay)", event.id),
            });
        }
    }

    for event in &log.events {
        match &event.skill_id {
            None => warnings.push(ValidationWarning {
                subject: Some(event.id.to_string()),
                message: format!(
                    "{} event maps to no skill and will not affect progress",
                    event.kind
                ),
            }),
            Some(skill) if !log.skill_totals.contains_key(skill) => {
                warnings.push(ValidationWarning {
                    subject: Some(event.id.to_string()),
                    message: format!("no totals for skill '{skill}', counts cannot normalize"),
                });
            }
            Some(_) => {}
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

/// Top-level skillforge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillforgeConfig {
    /// Max concurrent evaluations in a batch run.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Score percentage required for mastery at full completion.
    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: f64,
}

fn default_parallelism() -> usize {
    4
}

fn default_mastery_threshold() -> f64 {
    DEFAULT_MASTERY_THRESHOLD
}

impl Default for SkillforgeConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            scoring: ScoringConfig::default(),
            mastery_threshold: default_mastery_threshold(),
        }
    }
}

impl SkillforgeConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            parallelism: self.parallelism,
            scoring: self.scoring.clone(),
        }
    }
}

/// Load configuration from an explicit path, or `skillforge.toml` in the
/// current directory, falling back to defaults.
///
/// Validation failures here are fatal before any scoring occurs.
pub fn load_config(path: Option<&Path>) -> Result<SkillforgeConfig> {
    let config_path = match path {
        Some(p) => {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                anyhow::bail!("config file not found: {}", p.display());
            }
        }
        None => {
            let local = std::path::PathBuf::from("skillforge.toml");
            local.exists().then_some(local)
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SkillforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkillforgeConfig::default(),
    };

    config.scoring.validate()?;
    if !(0.0..=100.0).contains(&config.mastery_threshold) {
        return Err(ConfigError::MasteryThreshold(config.mastery_threshold).into());
    }
    if config.parallelism < 1 {
        return Err(ConfigError::Parallelism.into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_BATCH: &str = r#"
[batch]
id = "cohort-2026-03"
name = "March Cohort"
description = "Lab submissions for the March cohort"

[[submissions]]
id = "sub-001"
user = "u-ada"
lab = "lab-payments"
skill = "backend-services"
submitted_at = "2026-03-07T10:00:00Z"
code = """
fn main() {
    println!("payments");
}
"""

[submissions.signals.functionality]
tests_passed = 12
tests_total = 12
coverage = 0.85
endpoints_working = 5
endpoints_total = 5

[submissions.signals.code_quality]
bugs = 1
vulnerabilities = 0
code_smells = 3
duplication_pct = 4.0
"#;

    const VALID_LOG: &str = r#"
[log]
id = "activity-march"
name = "March activity"

[users]
u-ada = "Ada"

[totals.backend-services]
modules = 4
lessons = 12
labs = 4
quizzes = 4
points_possible = 400

[[events]]
id = "7f0e0a50-0000-0000-0000-000000000001"
user = "u-ada"
kind = "module_completed"
entity = "mod-1"
entity_kind = "module"
skill = "backend-services"
timestamp = "2026-03-01T10:00:00Z"

[[events]]
user = "u-ada"
kind = "quiz_passed"
entity = "quiz-1"
entity_kind = "quiz"
skill = "backend-services"
points = 80
time_spent_minutes = 15
timestamp = "2026-03-02T10:00:00Z"
"#;

    #[test]
    fn parse_valid_batch() {
        let batch = parse_batch_str(VALID_BATCH, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(batch.id, "cohort-2026-03");
        assert_eq!(batch.submissions.len(), 1);
        let sub = &batch.submissions[0];
        assert_eq!(sub.user_id, "u-ada");
        assert_eq!(sub.skill_id.as_deref(), Some("backend-services"));
        let signals = sub.signals.as_ref().unwrap();
        assert_eq!(signals.functionality.as_ref().unwrap().tests_total, 12);
        assert!(signals.architecture.is_none());
    }

    #[test]
    fn parse_batch_missing_optional_fields() {
        let toml = r#"
[batch]
id = "minimal"
name = "Minimal"

[[submissions]]
id = "s1"
user = "u1"
lab = "lab1"
code = "fn main() {}"
submitted_at = "2026-03-07T10:00:00Z"
"#;
        let batch = parse_batch_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert!(batch.submissions[0].signals.is_none());
        assert!(batch.submissions[0].skill_id.is_none());
    }

    #[test]
    fn parse_valid_activity_log() {
        let log = parse_activity_log_str(VALID_LOG, &PathBuf::from("log.toml")).unwrap();
        assert_eq!(log.events.len(), 2);
        assert_eq!(log.user_names.get("u-ada").unwrap(), "Ada");
        assert_eq!(log.skill_totals["backend-services"].modules, 4);
        assert_eq!(log.events[0].kind, ActivityKind::ModuleCompleted);
        assert_eq!(log.events[1].points_earned, Some(80));
        // Omitted event ids are generated.
        assert_ne!(log.events[0].id, log.events[1].id);
    }

    #[test]
    fn validate_duplicate_submission_ids() {
        let toml = r#"
[batch]
id = "dupes"
name = "Dupes"

[[submissions]]
id = "same"
user = "u1"
lab = "lab1"
code = "fn main() {}"
submitted_at = "2026-03-07T10:00:00Z"

[[submissions]]
id = "same"
user = "u2"
lab = "lab1"
code = "fn main() {}"
submitted_at = "2026-03-07T11:00:00Z"
"#;
        let batch = parse_batch_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_batch(&batch);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_empty_code() {
        let toml = r#"
[batch]
id = "empty"
name = "Empty"

[[submissions]]
id = "s1"
user = "u1"
lab = "lab1"
submitted_at = "2026-03-07T10:00:00Z"
"#;
        let batch = parse_batch_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_batch(&batch);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("neither code nor signals")));
    }

    #[test]
    fn validate_log_unknown_skill() {
        let toml = r#"
[log]
id = "log1"

[[events]]
user = "u1"
kind = "module_completed"
entity = "mod-1"
entity_kind = "module"
skill = "ghost-skill"
timestamp = "2026-03-01T10:00:00Z"
"#;
        let log = parse_activity_log_str(toml, &PathBuf::from("log.toml")).unwrap();
        let warnings = validate_activity_log(&log);
        assert!(warnings.iter().any(|w| w.message.contains("ghost-skill")));
    }

    #[test]
    fn validate_log_unmapped_event() {
        let toml = r#"
[log]
id = "log1"

[[events]]
user = "u1"
kind = "login"
entity = "session"
entity_kind = "platform"
timestamp = "2026-03-01T10:00:00Z"
"#;
        let log = parse_activity_log_str(toml, &PathBuf::from("log.toml")).unwrap();
        let warnings = validate_activity_log(&log);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("maps to no skill")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_batch_str(bad, &PathBuf::from("bad.toml")).is_err());
        assert!(parse_activity_log_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("batch.toml"), VALID_BATCH).unwrap();

        let batches = load_batch_directory(dir.path()).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].id, "cohort-2026-03");
    }

    #[test]
    fn default_config_when_no_file() {
        let config = SkillforgeConfig::default();
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.scoring.pass_threshold, 75);
        assert_eq!(config.mastery_threshold, 90.0);
    }

    #[test]
    fn load_config_rejects_bad_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skillforge.toml");
        std::fs::write(
            &path,
            r#"
[scoring.weights]
functionality = 0.90
code_quality = 0.25
architecture = 0.15
resilience = 0.15
operability = 0.05
"#,
        )
        .unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn load_config_parses_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skillforge.toml");
        std::fs::write(
            &path,
            r#"
parallelism = 8
mastery_threshold = 85.0

[scoring]
pass_threshold = 70
"#,
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.parallelism, 8);
        assert_eq!(config.mastery_threshold, 85.0);
        assert_eq!(config.scoring.pass_threshold, 70);
        // Unspecified weights fall back to the defaults.
        assert!((config.scoring.weights.functionality - 0.40).abs() < 1e-9);
    }
}
