//! Core data model types for skillforge.
//!
//! These are the fundamental types the entire skillforge system uses to
//! represent submissions, analysis signals, and learning activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The five fixed evaluation dimensions of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Functionality,
    CodeQuality,
    Architecture,
    Resilience,
    Operability,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 5] = [
        Category::Functionality,
        Category::CodeQuality,
        Category::Architecture,
        Category::Resilience,
        Category::Operability,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Functionality => write!(f, "functionality"),
            Category::CodeQuality => write!(f, "code_quality"),
            Category::Architecture => write!(f, "architecture"),
            Category::Resilience => write!(f, "resilience"),
            Category::Operability => write!(f, "operability"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "functionality" => Ok(Category::Functionality),
            "code_quality" | "code-quality" | "quality" => Ok(Category::CodeQuality),
            "architecture" => Ok(Category::Architecture),
            "resilience" => Ok(Category::Resilience),
            "operability" => Ok(Category::Operability),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Raw test-execution signals behind the functionality score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionalitySignals {
    /// Tests that passed.
    pub tests_passed: u32,
    /// Tests that were discovered.
    pub tests_total: u32,
    /// Line coverage as a ratio in `[0, 1]`.
    #[serde(default)]
    pub coverage: f64,
    /// Endpoints responding correctly.
    #[serde(default)]
    pub endpoints_working: u32,
    /// Endpoints declared by the lab.
    #[serde(default)]
    pub endpoints_total: u32,
}

/// Static-analysis counters behind the code-quality score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeQualitySignals {
    pub bugs: u32,
    pub vulnerabilities: u32,
    pub code_smells: u32,
    /// Duplicated-line percentage on the 0-100 scale.
    #[serde(default)]
    pub duplication_pct: f64,
}

/// Design-structure signals behind the architecture score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchitectureSignals {
    /// Names of recognized design patterns.
    #[serde(default)]
    pub design_patterns: Vec<String>,
    #[serde(default)]
    pub has_layering: bool,
    #[serde(default)]
    pub has_dependency_injection: bool,
    /// API design sub-score on the 0-100 scale.
    #[serde(default)]
    pub api_design: u32,
}

/// Fault-tolerance signals behind the resilience score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResilienceSignals {
    #[serde(default)]
    pub has_circuit_breaker: bool,
    #[serde(default)]
    pub has_retry: bool,
    #[serde(default)]
    pub has_timeout: bool,
    #[serde(default)]
    pub has_fallback: bool,
    /// Error-handling quality sub-score on the 0-100 scale.
    #[serde(default)]
    pub error_handling: u32,
}

/// Observability signals behind the operability score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperabilitySignals {
    #[serde(default)]
    pub has_metrics: bool,
    #[serde(default)]
    pub has_health_checks: bool,
    /// Logging quality sub-score on the 0-100 scale.
    #[serde(default)]
    pub logging: u32,
    /// Documentation sub-score on the 0-100 scale.
    #[serde(default)]
    pub documentation: u32,
}

/// The full signal bundle for one submission.
///
/// Absent categories are not errors: the scoring engine simply omits them
/// from the weighted sum and produces a best-effort result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalSet {
    #[serde(default)]
    pub functionality: Option<FunctionalitySignals>,
    #[serde(default)]
    pub code_quality: Option<CodeQualitySignals>,
    #[serde(default)]
    pub architecture: Option<ArchitectureSignals>,
    #[serde(default)]
    pub resilience: Option<ResilienceSignals>,
    #[serde(default)]
    pub operability: Option<OperabilitySignals>,
}

impl SignalSet {
    /// Categories for which signals are present, in report order.
    pub fn present_categories(&self) -> Vec<Category> {
        let mut present = Vec::new();
        if self.functionality.is_some() {
            present.push(Category::Functionality);
        }
        if self.code_quality.is_some() {
            present.push(Category::CodeQuality);
        }
        if self.architecture.is_some() {
            present.push(Category::Architecture);
        }
        if self.resilience.is_some() {
            present.push(Category::Resilience);
        }
        if self.operability.is_some() {
            present.push(Category::Operability);
        }
        present
    }

    pub fn is_empty(&self) -> bool {
        self.present_categories().is_empty()
    }
}

/// A learner submission awaiting evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier for this submission.
    pub id: String,
    /// The learner who submitted.
    pub user_id: String,
    /// The lab being attempted.
    pub lab_id: String,
    /// The skill this lab belongs to, when the catalog resolved one.
    #[serde(default)]
    pub skill_id: Option<String>,
    /// Raw source text of the submitted work.
    pub code: String,
    /// Pre-computed analysis signals. When present these take precedence
    /// over anything the configured analyzer would derive from `code`.
    #[serde(default)]
    pub signals: Option<SignalSet>,
    /// When the learner submitted.
    pub submitted_at: DateTime<Utc>,
}

/// A named batch of submissions evaluated together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionBatch {
    /// Unique identifier for this batch.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of the batch.
    #[serde(default)]
    pub description: String,
    /// The submissions in this batch.
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

/// Everything a learner can do that the platform records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    LessonStarted,
    LessonCompleted,
    QuizStarted,
    QuizCompleted,
    QuizPassed,
    LabStarted,
    LabSubmitted,
    LabPassed,
    ModuleStarted,
    ModuleCompleted,
    SkillStarted,
    SkillCompleted,
    SkillMastered,
    Login,
    Logout,
    AchievementEarned,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityKind::LessonStarted => "lesson_started",
            ActivityKind::LessonCompleted => "lesson_completed",
            ActivityKind::QuizStarted => "quiz_started",
            ActivityKind::QuizCompleted => "quiz_completed",
            ActivityKind::QuizPassed => "quiz_passed",
            ActivityKind::LabStarted => "lab_started",
            ActivityKind::LabSubmitted => "lab_submitted",
            ActivityKind::LabPassed => "lab_passed",
            ActivityKind::ModuleStarted => "module_started",
            ActivityKind::ModuleCompleted => "module_completed",
            ActivityKind::SkillStarted => "skill_started",
            ActivityKind::SkillCompleted => "skill_completed",
            ActivityKind::SkillMastered => "skill_mastered",
            ActivityKind::Login => "login",
            ActivityKind::Logout => "logout",
            ActivityKind::AchievementEarned => "achievement_earned",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lesson_started" => Ok(ActivityKind::LessonStarted),
            "lesson_completed" => Ok(ActivityKind::LessonCompleted),
            "quiz_started" => Ok(ActivityKind::QuizStarted),
            "quiz_completed" => Ok(ActivityKind::QuizCompleted),
            "quiz_passed" => Ok(ActivityKind::QuizPassed),
            "lab_started" => Ok(ActivityKind::LabStarted),
            "lab_submitted" => Ok(ActivityKind::LabSubmitted),
            "lab_passed" => Ok(ActivityKind::LabPassed),
            "module_started" => Ok(ActivityKind::ModuleStarted),
            "module_completed" => Ok(ActivityKind::ModuleCompleted),
            "skill_started" => Ok(ActivityKind::SkillStarted),
            "skill_completed" => Ok(ActivityKind::SkillCompleted),
            "skill_mastered" => Ok(ActivityKind::SkillMastered),
            "login" => Ok(ActivityKind::Login),
            "logout" => Ok(ActivityKind::Logout),
            "achievement_earned" => Ok(ActivityKind::AchievementEarned),
            other => Err(format!("unknown activity kind: {other}")),
        }
    }
}

/// What kind of catalog entity an activity touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Skill,
    Module,
    Lesson,
    Lab,
    Quiz,
    /// Session-level activity (login/logout) with no catalog entity.
    Platform,
}

/// One recorded learning activity. Append-only, immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Unique event identity, used to deduplicate redelivery.
    pub id: Uuid,
    /// The learner this activity belongs to.
    pub user_id: String,
    pub kind: ActivityKind,
    /// Identifier of the entity acted on.
    pub entity_id: String,
    pub entity_kind: EntityKind,
    /// The skill this activity counts toward, when the catalog resolved
    /// one. Events without a skill are ignored by the progress machine.
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub points_earned: Option<u32>,
    #[serde(default)]
    pub time_spent_minutes: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate element counts for a skill, supplied by the content catalog.
///
/// The progress machine never navigates the catalog itself; these plain
/// totals are all it needs to normalize percentages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SkillTotals {
    pub modules: u32,
    #[serde(default)]
    pub lessons: u32,
    #[serde(default)]
    pub labs: u32,
    #[serde(default)]
    pub quizzes: u32,
    /// Total points across all labs and quizzes of the skill.
    #[serde(default)]
    pub points_possible: u32,
}
