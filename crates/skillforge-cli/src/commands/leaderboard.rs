//! The `skillforge leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;

use skillforge_core::leaderboard::rank;
use skillforge_core::parser;
use skillforge_core::progress::ProgressLedger;

pub async fn execute(log_path: PathBuf, limit: usize) -> Result<()> {
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let log = parser::parse_activity_log(&log_path)?;

    let ledger = ProgressLedger::new();
    for event in &log.events {
        let totals = event
            .skill_id
            .as_deref()
            .and_then(|skill| log.skill_totals.get(skill))
            .copied()
            .unwrap_or_default();
        ledger.record(event, &totals).await;
    }

    let mut totals = ledger.user_totals().await;
    for entry in &mut totals {
        if let Some(name) = log.user_names.get(&entry.user_id) {
            entry.user_name = name.clone();
        }
    }

    let entries = rank(totals, limit);
    anyhow::ensure!(!entries.is_empty(), "no activity to rank");

    print_leaderboard(&entries);
    Ok(())
}

fn print_leaderboard(entries: &[skillforge_core::leaderboard::LeaderboardEntry]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Rank", "User", "Points", "Completed skills"]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.user_name),
            Cell::new(entry.total_points),
            Cell::new(entry.completed_skills),
        ]);
    }

    println!("{table}");
}
