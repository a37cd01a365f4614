//! Per-skill progress tracking.
//!
//! `apply` is a pure value transformation: progress in, event in, new
//! progress out. Persistence, transactions, and delivery are caller
//! concerns. The in-memory `ProgressLedger` layers per-key serialization
//! and event deduplication on top for concurrent use.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;
use crate::leaderboard::UserTotals;
use crate::model::{ActivityEvent, ActivityKind, SkillTotals};

/// Score percentage at or above which a fully completed skill counts as
/// mastered.
pub const DEFAULT_MASTERY_THRESHOLD: f64 = 90.0;

/// Lifecycle of a learner's progress toward one skill.
///
/// Transitions only move forward: `NotStarted` → `InProgress` →
/// `Completed` → `Mastered`. Later activity may upgrade `Completed` to
/// `Mastered` but never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
    Mastered,
}

impl ProgressStatus {
    fn rank(self) -> u8 {
        match self {
            ProgressStatus::NotStarted => 0,
            ProgressStatus::InProgress => 1,
            ProgressStatus::Completed => 2,
            ProgressStatus::Mastered => 3,
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::NotStarted => write!(f, "not_started"),
            ProgressStatus::InProgress => write!(f, "in_progress"),
            ProgressStatus::Completed => write!(f, "completed"),
            ProgressStatus::Mastered => write!(f, "mastered"),
        }
    }
}

/// One learner's progress toward one skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillProgress {
    pub user_id: String,
    pub skill_id: String,
    pub status: ProgressStatus,
    /// Module completion on the 0-100 scale. Monotonically non-decreasing.
    pub completion_percentage: u32,
    pub total_modules: u32,
    pub completed_modules: u32,
    pub total_lessons: u32,
    pub completed_lessons: u32,
    pub total_labs: u32,
    pub passed_labs: u32,
    pub total_quizzes: u32,
    pub passed_quizzes: u32,
    pub total_points_earned: u32,
    pub total_points_possible: u32,
    pub total_time_spent_minutes: u32,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl SkillProgress {
    /// A zeroed record for a (user, skill) pair seen for the first time.
    pub fn new(user_id: &str, skill_id: &str, totals: &SkillTotals) -> Self {
        Self {
            user_id: user_id.to_string(),
            skill_id: skill_id.to_string(),
            status: ProgressStatus::NotStarted,
            completion_percentage: 0,
            total_modules: totals.modules,
            completed_modules: 0,
            total_lessons: totals.lessons,
            completed_lessons: 0,
            total_labs: totals.labs,
            passed_labs: 0,
            total_quizzes: totals.quizzes,
            passed_quizzes: 0,
            total_points_earned: 0,
            total_points_possible: totals.points_possible,
            total_time_spent_minutes: 0,
            started_at: None,
            completed_at: None,
            last_activity_at: None,
        }
    }

    /// Earned points as a percentage of possible points.
    pub fn score_percentage(&self) -> f64 {
        if self.total_points_possible == 0 {
            0.0
        } else {
            f64::from(self.total_points_earned) / f64::from(self.total_points_possible) * 100.0
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(
            self.status,
            ProgressStatus::Completed | ProgressStatus::Mastered
        )
    }

    pub fn is_mastered(&self) -> bool {
        self.status == ProgressStatus::Mastered
    }
}

/// Apply one activity event to a progress record.
///
/// The caller must guarantee at-most-once delivery per event; the ledger
/// below enforces it by event id. `mastery_threshold` is the score
/// percentage required for `Mastered` at full completion.
pub fn apply(
    progress: &SkillProgress,
    event: &ActivityEvent,
    mastery_threshold: f64,
) -> SkillProgress {
    let mut next = progress.clone();

    match event.kind {
        ActivityKind::LessonCompleted => next.completed_lessons += 1,
        ActivityKind::QuizPassed => next.passed_quizzes += 1,
        ActivityKind::LabPassed => next.passed_labs += 1,
        ActivityKind::ModuleCompleted => next.completed_modules += 1,
        _ => {}
    }
    if let Some(points) = event.points_earned {
        next.total_points_earned += points;
    }
    if let Some(minutes) = event.time_spent_minutes {
        next.total_time_spent_minutes += minutes;
    }

    let recomputed = if next.total_modules > 0 {
        (next.completed_modules * 100 / next.total_modules).min(100)
    } else {
        0
    };
    // A replayed or out-of-order event must never lower the stored value.
    next.completion_percentage = next.completion_percentage.max(recomputed);

    let candidate = if next.completion_percentage == 0 {
        ProgressStatus::NotStarted
    } else if next.completion_percentage == 100 {
        if next.score_percentage() >= mastery_threshold {
            ProgressStatus::Mastered
        } else {
            ProgressStatus::Completed
        }
    } else {
        ProgressStatus::InProgress
    };

    if candidate.rank() > next.status.rank() {
        if candidate == ProgressStatus::InProgress && next.started_at.is_none() {
            next.started_at = Some(event.timestamp);
        }
        if matches!(
            candidate,
            ProgressStatus::Completed | ProgressStatus::Mastered
        ) && next.completed_at.is_none()
        {
            next.completed_at = Some(event.timestamp);
        }
        next.status = candidate;
    }

    next.last_activity_at = Some(event.timestamp);
    next
}

/// Explicit output event describing a progress change.
///
/// Callers forward these to whatever transport they use (bus, queue,
/// direct notification); the ledger just returns the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub event_id: Uuid,
    pub user_id: String,
    pub skill_id: String,
    pub kind: ActivityKind,
    #[serde(default)]
    pub points_earned: Option<u32>,
    pub status: ProgressStatus,
    pub completion_percentage: u32,
    pub timestamp: DateTime<Utc>,
}

type ProgressKey = (String, String);

struct LedgerEntry {
    progress: SkillProgress,
    seen_events: HashSet<Uuid>,
}

/// In-memory arena of progress records keyed by (user, skill).
///
/// Distinct keys update concurrently; each key serializes its writers
/// behind a per-entry async mutex so the read-increment-recompute-write
/// sequence never interleaves.
pub struct ProgressLedger {
    entries: Mutex<HashMap<ProgressKey, Arc<tokio::sync::Mutex<LedgerEntry>>>>,
    mastery_threshold: f64,
    unmapped_events: AtomicU64,
}

impl Default for ProgressLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            mastery_threshold: DEFAULT_MASTERY_THRESHOLD,
            unmapped_events: AtomicU64::new(0),
        }
    }

    /// Build a ledger with a custom mastery threshold.
    pub fn with_mastery_threshold(threshold: f64) -> Result<Self, ConfigError> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::MasteryThreshold(threshold));
        }
        Ok(Self {
            mastery_threshold: threshold,
            ..Self::new()
        })
    }

    fn entry(&self, event: &ActivityEvent, skill_id: &str, totals: &SkillTotals) -> Arc<tokio::sync::Mutex<LedgerEntry>> {
        let key = (event.user_id.clone(), skill_id.to_string());
        let mut map = self.entries.lock().expect("ledger map poisoned");
        Arc::clone(map.entry(key).or_insert_with(|| {
            Arc::new(tokio::sync::Mutex::new(LedgerEntry {
                progress: SkillProgress::new(&event.user_id, skill_id, totals),
                seen_events: HashSet::new(),
            }))
        }))
    }

    /// Record one activity event.
    ///
    /// Returns the resulting update, or `None` when the event maps to no
    /// skill or was already recorded (duplicate delivery).
    pub async fn record(
        &self,
        event: &ActivityEvent,
        totals: &SkillTotals,
    ) -> Option<ProgressUpdate> {
        let Some(skill_id) = event.skill_id.clone() else {
            self.unmapped_events.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                event = %event.id,
                user = %event.user_id,
                kind = %event.kind,
                "activity maps to no skill, ignoring"
            );
            return None;
        };

        let entry = self.entry(event, &skill_id, totals);
        let mut guard = entry.lock().await;

        if !guard.seen_events.insert(event.id) {
            tracing::debug!(event = %event.id, "duplicate activity event, ignoring");
            return None;
        }

        guard.progress = apply(&guard.progress, event, self.mastery_threshold);

        Some(ProgressUpdate {
            event_id: event.id,
            user_id: event.user_id.clone(),
            skill_id,
            kind: event.kind,
            points_earned: event.points_earned,
            status: guard.progress.status,
            completion_percentage: guard.progress.completion_percentage,
            timestamp: event.timestamp,
        })
    }

    /// Snapshot of one (user, skill) record.
    pub async fn snapshot(&self, user_id: &str, skill_id: &str) -> Option<SkillProgress> {
        let entry = {
            let map = self.entries.lock().expect("ledger map poisoned");
            map.get(&(user_id.to_string(), skill_id.to_string()))
                .cloned()
        }?;
        let guard = entry.lock().await;
        Some(guard.progress.clone())
    }

    /// All records for one user, ordered by skill id.
    pub async fn user_progress(&self, user_id: &str) -> Vec<SkillProgress> {
        let entries: Vec<_> = {
            let map = self.entries.lock().expect("ledger map poisoned");
            map.iter()
                .filter(|((user, _), _)| user == user_id)
                .map(|(_, entry)| Arc::clone(entry))
                .collect()
        };
        let mut progress = Vec::with_capacity(entries.len());
        for entry in entries {
            progress.push(entry.lock().await.progress.clone());
        }
        progress.sort_by(|a, b| a.skill_id.cmp(&b.skill_id));
        progress
    }

    /// All records, ordered by (user, skill).
    pub async fn all_progress(&self) -> Vec<SkillProgress> {
        let entries: Vec<_> = {
            let map = self.entries.lock().expect("ledger map poisoned");
            map.values().map(Arc::clone).collect()
        };
        let mut progress = Vec::with_capacity(entries.len());
        for entry in entries {
            progress.push(entry.lock().await.progress.clone());
        }
        progress.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then_with(|| a.skill_id.cmp(&b.skill_id))
        });
        progress
    }

    /// Per-user point totals for leaderboard ranking.
    pub async fn user_totals(&self) -> Vec<UserTotals> {
        let mut by_user: HashMap<String, UserTotals> = HashMap::new();
        for progress in self.all_progress().await {
            let entry = by_user
                .entry(progress.user_id.clone())
                .or_insert_with(|| UserTotals {
                    user_id: progress.user_id.clone(),
                    user_name: progress.user_id.clone(),
                    total_points: 0,
                    completed_skills: 0,
                });
            entry.total_points += progress.total_points_earned;
            if progress.is_completed() {
                entry.completed_skills += 1;
            }
        }
        let mut totals: Vec<UserTotals> = by_user.into_values().collect();
        totals.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        totals
    }

    /// How many events were ignored for lack of a skill mapping.
    pub fn unmapped_events(&self) -> u64 {
        self.unmapped_events.load(Ordering::Relaxed)
    }
}
