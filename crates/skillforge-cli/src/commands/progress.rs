//! The `skillforge progress` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};

use skillforge_core::parser;
use skillforge_core::progress::ProgressLedger;
use skillforge_core::statistics::summarize_user;

pub async fn execute(
    log_path: PathBuf,
    user_filter: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = parser::load_config(config_path.as_deref())?;
    let log = parser::parse_activity_log(&log_path)?;

    let ledger = ProgressLedger::with_mastery_threshold(config.mastery_threshold)?;
    let mut applied = 0usize;
    for event in &log.events {
        let totals = event
            .skill_id
            .as_deref()
            .and_then(|skill| log.skill_totals.get(skill))
            .copied()
            .unwrap_or_default();
        if ledger.record(event, &totals).await.is_some() {
            applied += 1;
        }
    }

    eprintln!(
        "Replayed {} of {} events ({} unmapped)\n",
        applied,
        log.events.len(),
        ledger.unmapped_events()
    );

    let progress = match &user_filter {
        Some(user) => ledger.user_progress(user).await,
        None => ledger.all_progress().await,
    };
    anyhow::ensure!(!progress.is_empty(), "no progress records for this input");

    print_progress_table(&progress);

    // Per-user summary with streaks from the raw activity timestamps.
    let mut activity_by_user: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();
    for event in &log.events {
        activity_by_user
            .entry(event.user_id.as_str())
            .or_default()
            .push(event.timestamp);
    }

    let mut users: Vec<&str> = progress.iter().map(|p| p.user_id.as_str()).collect();
    users.sort_unstable();
    users.dedup();

    println!();
    for user in users {
        let records: Vec<_> = progress
            .iter()
            .filter(|p| p.user_id == user)
            .cloned()
            .collect();
        let activity = activity_by_user.get(user).cloned().unwrap_or_default();
        let stats = summarize_user(user, &records, &activity);
        let name = log.user_names.get(user).map(String::as_str).unwrap_or(user);
        println!(
            "{name}: {} pts | {} started, {} completed, {} mastered | {} active days, {}-day streak | {} min on task",
            stats.total_points_earned,
            stats.skills_started,
            stats.skills_completed,
            stats.skills_mastered,
            stats.active_days,
            stats.streak_days,
            stats.total_time_spent_minutes,
        );
    }

    Ok(())
}

fn print_progress_table(progress: &[skillforge_core::progress::SkillProgress]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "User",
        "Skill",
        "Status",
        "Completion",
        "Modules",
        "Lessons",
        "Points",
    ]);

    for p in progress {
        table.add_row(vec![
            Cell::new(&p.user_id),
            Cell::new(&p.skill_id),
            Cell::new(p.status.to_string()),
            Cell::new(format!("{}%", p.completion_percentage)),
            Cell::new(format!("{}/{}", p.completed_modules, p.total_modules)),
            Cell::new(format!("{}/{}", p.completed_lessons, p.total_lessons)),
            Cell::new(format!(
                "{}/{}",
                p.total_points_earned, p.total_points_possible
            )),
        ]);
    }

    println!("{table}");
}
