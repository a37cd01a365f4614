//! Markdown report generator.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use skillforge_core::model::Category;
use skillforge_core::report::AssessmentReport;

/// Render an assessment report as Markdown.
pub fn generate_markdown(report: &AssessmentReport) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# Assessment report: {}", report.batch.name);
    let _ = writeln!(
        md,
        "\n{} submissions | run `{}` | {}\n",
        report.batch.submission_count,
        report.id,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    md.push_str("## Cohort summary\n\n");
    let _ = writeln!(
        md,
        "**Pass rate:** {:.1}% | **Average score:** {:.1} | **Plagiarism rate:** {:.1}%\n",
        report.cohort.pass_rate * 100.0,
        report.cohort.average_final_score,
        report.cohort.plagiarism_rate * 100.0
    );

    if !report.cohort.category_averages.is_empty() {
        md.push_str("| Category | Average |\n");
        md.push_str("|----------|---------|\n");
        for category in Category::ALL {
            if let Some(avg) = report.cohort.category_averages.get(&category) {
                let _ = writeln!(md, "| {category} | {avg:.1} |");
            }
        }
        md.push('\n');
    }

    md.push_str("## Results\n\n");
    md.push_str("| Submission | User | Score | Verdict | Plagiarism |\n");
    md.push_str("|------------|------|-------|---------|------------|\n");
    for result in &report.results {
        let _ = writeln!(
            md,
            "| {} | {} | {}/100 | {} | {} |",
            result.submission_id,
            result.user_id,
            result.final_score,
            if result.passed { "pass" } else { "fail" },
            if result.plagiarism_detected() {
                "flagged"
            } else {
                "-"
            }
        );
    }
    md.push('\n');

    for result in &report.results {
        let _ = writeln!(md, "---\n\n# {} ({})\n", result.submission_id, result.user_id);
        md.push_str(&result.feedback);
        md.push('\n');
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let md = generate_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}
