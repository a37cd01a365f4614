//! The `skillforge evaluate` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use skillforge_analysis::{SimilarityScanner, StaticAnalyzer};
use skillforge_core::engine::{AssessmentEngine, AssessmentObserver};
use skillforge_core::parser;
use skillforge_core::results::AssessmentResult;
use skillforge_report::{write_html_report, write_markdown_report};

/// Console progress reporter.
struct ConsoleObserver;

impl AssessmentObserver for ConsoleObserver {
    fn on_submission_start(&self, submission_id: &str, user_id: &str) {
        eprintln!("  Scoring: {user_id} :: {submission_id}");
    }

    fn on_submission_scored(&self, result: &AssessmentResult) {
        let verdict = if result.passed { "PASS" } else { "FAIL" };
        let plagiarism = if result.plagiarism_detected() {
            " [plagiarism]"
        } else {
            ""
        };
        eprintln!(
            "  Done: {} :: {} {}/100 {verdict}{plagiarism}",
            result.user_id, result.submission_id, result.final_score,
        );
    }

    fn on_batch_complete(&self, total: usize, passed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {passed}/{total} passed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    submissions_path: PathBuf,
    output: PathBuf,
    format: String,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = parser::load_config(config_path.as_deref())?;
    if let Some(parallelism) = parallelism {
        anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
        config.parallelism = parallelism;
    }

    let batches = if submissions_path.is_dir() {
        parser::load_batch_directory(&submissions_path)?
    } else {
        vec![parser::parse_batch(&submissions_path)?]
    };
    anyhow::ensure!(!batches.is_empty(), "no batches found");

    let engine = AssessmentEngine::new(
        Arc::new(StaticAnalyzer::new()),
        Arc::new(SimilarityScanner::new()),
        config.engine_config(),
    )?;
    let observer = ConsoleObserver;

    for batch in &batches {
        eprintln!(
            "skillforge — evaluating {} ({} submissions)\n",
            batch.name,
            batch.submissions.len()
        );

        let report = engine.run_batch(batch, &observer).await;

        print_summary(&report);

        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

        let formats: Vec<&str> = if format == "all" {
            vec!["json", "html", "markdown"]
        } else {
            format.split(',').map(str::trim).collect()
        };

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("report-{}-{timestamp}.json", batch.id));
                    report.save_json(&path)?;
                    println!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("report-{}-{timestamp}.html", batch.id));
                    write_html_report(&report, &path)?;
                    println!("HTML report: {}", path.display());
                }
                "markdown" | "md" => {
                    let path = output.join(format!("report-{}-{timestamp}.md", batch.id));
                    write_markdown_report(&report, &path)?;
                    println!("Markdown report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }
    }

    Ok(())
}

fn print_summary(report: &skillforge_core::report::AssessmentReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Submission", "User", "Score", "Verdict", "Plagiarism"]);

    for result in &report.results {
        table.add_row(vec![
            Cell::new(&result.submission_id),
            Cell::new(&result.user_id),
            Cell::new(format!("{}/100", result.final_score)),
            Cell::new(if result.passed { "pass" } else { "fail" }),
            Cell::new(if result.plagiarism_detected() {
                "flagged"
            } else {
                "-"
            }),
        ]);
    }

    println!("{table}");
    println!(
        "Pass rate: {:.1}% | Average score: {:.1} | Plagiarism rate: {:.1}%",
        report.cohort.pass_rate * 100.0,
        report.cohort.average_final_score,
        report.cohort.plagiarism_rate * 100.0,
    );
}
