//! The `skillforge validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use skillforge_core::parser::{
    parse_activity_log_str, parse_batch_str, validate_activity_log, validate_batch,
    ValidationWarning,
};

pub fn execute(input: PathBuf) -> Result<()> {
    let mut total_warnings = 0;

    if input.is_dir() {
        for entry in std::fs::read_dir(&input)
            .with_context(|| format!("failed to read directory: {}", input.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                total_warnings += validate_file(&path)?;
            }
        }
    } else {
        total_warnings += validate_file(&input)?;
    }

    if total_warnings == 0 {
        println!("All inputs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

/// Validate one TOML file, detecting whether it is a batch or a log.
fn validate_file(path: &Path) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: toml::Value = toml::from_str(&content)
        .with_context(|| format!("failed to parse TOML: {}", path.display()))?;

    let warnings = if value.get("batch").is_some() {
        let batch = parse_batch_str(&content, path)?;
        println!(
            "Batch: {} ({} submissions)",
            batch.name,
            batch.submissions.len()
        );
        validate_batch(&batch)
    } else if value.get("log").is_some() {
        let log = parse_activity_log_str(&content, path)?;
        println!("Activity log: {} ({} events)", log.id, log.events.len());
        validate_activity_log(&log)
    } else {
        anyhow::bail!(
            "{}: expected a [batch] or [log] table",
            path.display()
        );
    };

    print_warnings(&warnings);
    Ok(warnings.len())
}

fn print_warnings(warnings: &[ValidationWarning]) {
    for w in warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
}
