//! Point-total leaderboard ranking.

use serde::{Deserialize, Serialize};

/// Per-user aggregate totals across all skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTotals {
    pub user_id: String,
    /// Display name; falls back to the user id when unknown.
    pub user_name: String,
    pub total_points: u32,
    pub completed_skills: u32,
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub user_name: String,
    pub total_points: u32,
    pub completed_skills: u32,
    /// 1-based position after sorting.
    pub rank: u32,
}

/// Rank users by total points, descending.
///
/// Ties break by ascending user id so repeated calls over the same totals
/// produce identical orderings. Recomputed in full on every call; nothing
/// incremental is maintained at this scale.
pub fn rank(mut totals: Vec<UserTotals>, limit: usize) -> Vec<LeaderboardEntry> {
    totals.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    totals
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, t)| LeaderboardEntry {
            user_id: t.user_id,
            user_name: t.user_name,
            total_points: t.total_points,
            completed_skills: t.completed_skills,
            rank: i as u32 + 1,
        })
        .collect()
}
