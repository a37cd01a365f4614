//! Aggregate statistics over progress records and assessment batches.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Category;
use crate::progress::{ProgressStatus, SkillProgress};
use crate::results::AssessmentResult;
use crate::streak::{distinct_activity_dates, streak_days};

/// Summary of one user's progress across all skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgressStats {
    pub user_id: String,
    pub skills_started: u32,
    pub skills_completed: u32,
    pub skills_mastered: u32,
    pub total_points_earned: u32,
    pub total_time_spent_minutes: u32,
    /// Mean completion percentage over started skills.
    pub average_completion: f64,
    /// Distinct calendar days with at least one activity.
    pub active_days: u32,
    /// Consecutive active days ending at the most recent date.
    pub streak_days: u32,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// Summarize a user's progress records and activity timestamps.
pub fn summarize_user(
    user_id: &str,
    progress: &[SkillProgress],
    activity: &[DateTime<Utc>],
) -> UserProgressStats {
    let started: Vec<&SkillProgress> = progress
        .iter()
        .filter(|p| p.status != ProgressStatus::NotStarted)
        .collect();

    let average_completion = if started.is_empty() {
        0.0
    } else {
        started
            .iter()
            .map(|p| f64::from(p.completion_percentage))
            .sum::<f64>()
            / started.len() as f64
    };

    let dates = distinct_activity_dates(activity.iter().copied());

    UserProgressStats {
        user_id: user_id.to_string(),
        skills_started: started.len() as u32,
        skills_completed: progress.iter().filter(|p| p.is_completed()).count() as u32,
        skills_mastered: progress.iter().filter(|p| p.is_mastered()).count() as u32,
        total_points_earned: progress.iter().map(|p| p.total_points_earned).sum(),
        total_time_spent_minutes: progress.iter().map(|p| p.total_time_spent_minutes).sum(),
        average_completion,
        active_days: dates.len() as u32,
        streak_days: streak_days(&dates),
        last_activity_at: activity.iter().max().copied(),
    }
}

/// Aggregate statistics over one assessment batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortStats {
    pub submissions: usize,
    /// Share of submissions that passed.
    pub pass_rate: f64,
    /// Share of submissions flagged for plagiarism.
    pub plagiarism_rate: f64,
    pub average_final_score: f64,
    /// Mean score per category over submissions where it was evaluated.
    pub category_averages: HashMap<Category, f64>,
}

/// Compute aggregate statistics from a batch of results.
pub fn cohort_stats(results: &[AssessmentResult]) -> CohortStats {
    let n = results.len();
    if n == 0 {
        return CohortStats {
            submissions: 0,
            pass_rate: 0.0,
            plagiarism_rate: 0.0,
            average_final_score: 0.0,
            category_averages: HashMap::new(),
        };
    }

    let passed = results.iter().filter(|r| r.passed).count();
    let flagged = results.iter().filter(|r| r.plagiarism_detected()).count();
    let score_sum: u32 = results.iter().map(|r| r.final_score).sum();

    let mut category_averages = HashMap::new();
    for category in Category::ALL {
        let values: Vec<u32> = results
            .iter()
            .filter_map(|r| r.score_for(category))
            .collect();
        if !values.is_empty() {
            let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64;
            category_averages.insert(category, mean);
        }
    }

    CohortStats {
        submissions: n,
        pass_rate: passed as f64 / n as f64,
        plagiarism_rate: flagged as f64 / n as f64,
        average_final_score: f64::from(score_sum) / n as f64,
        category_averages,
    }
}
