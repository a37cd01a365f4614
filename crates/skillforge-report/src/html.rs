//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use skillforge_core::model::Category;
use skillforge_core::report::AssessmentReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from an assessment report.
pub fn generate_html(report: &AssessmentReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>skillforge report — {}</title>\n",
        html_escape(&report.batch.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>skillforge report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Batch: <strong>{}</strong> | {} submissions | {}</p>\n",
        html_escape(&report.batch.name),
        report.batch.submission_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Cohort summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"stats\">Pass rate <strong>{:.1}%</strong> | Average score <strong>{:.1}</strong> | Plagiarism rate <strong>{:.1}%</strong></p>\n",
        report.cohort.pass_rate * 100.0,
        report.cohort.average_final_score,
        report.cohort.plagiarism_rate * 100.0,
    ));

    if !report.cohort.category_averages.is_empty() {
        html.push_str(&generate_bar_chart(report));
    }
    html.push_str("</section>\n");

    // Per-submission results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str(
        "<thead><tr><th>Submission</th><th>User</th><th>Score</th><th>Verdict</th><th>Plagiarism</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");
    for result in &report.results {
        let verdict_class = if result.passed { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}/100</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            html_escape(&result.submission_id),
            html_escape(&result.user_id),
            result.final_score,
            verdict_class,
            if result.passed { "pass" } else { "fail" },
            if result.plagiarism_detected() {
                "flagged"
            } else {
                "&mdash;"
            },
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Feedback details
    html.push_str("<section class=\"feedback\">\n");
    html.push_str("<h2>Feedback</h2>\n");
    for result in &report.results {
        html.push_str(&format!(
            "<details><summary>{} ({})</summary><pre>{}</pre></details>\n",
            html_escape(&result.submission_id),
            html_escape(&result.user_id),
            html_escape(&result.feedback),
        ));
    }
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// SVG bar chart of per-category average scores.
fn generate_bar_chart(report: &AssessmentReport) -> String {
    let categories: Vec<(Category, f64)> = Category::ALL
        .iter()
        .filter_map(|&c| report.cohort.category_averages.get(&c).map(|&v| (c, v)))
        .collect();

    let bar_width: usize = 90;
    let gap: usize = 30;
    let chart_height: usize = 200;
    let width = categories.len() * (bar_width + gap) + gap;

    let mut svg = format!(
        "<svg viewBox=\"0 0 {width} {}\" class=\"chart\" role=\"img\">\n",
        chart_height + 40
    );
    for (i, (category, avg)) in categories.iter().enumerate() {
        let bar_height = (avg / 100.0 * f64::from(chart_height as u32)) as usize;
        let x = gap + i * (bar_width + gap);
        let y = chart_height - bar_height;
        svg.push_str(&format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{bar_width}\" height=\"{bar_height}\" class=\"bar\"/>\n",
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" class=\"bar-value\">{avg:.0}</text>\n",
            x + bar_width / 2,
            y.saturating_sub(6).max(12),
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" class=\"bar-label\">{category}</text>\n",
            x + bar_width / 2,
            chart_height + 20,
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0 2rem 4rem; background: #fafafa; color: #1a1a1a; }
header { padding: 2rem 0 1rem; border-bottom: 2px solid #e0e0e0; }
h1 { margin: 0 0 0.5rem; font-size: 1.6rem; }
h2 { margin-top: 2rem; font-size: 1.2rem; }
.meta, .stats { color: #555; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; background: #fff; }
th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e8e8e8; }
th { background: #f0f0f0; }
td.pass { color: #1a7f37; font-weight: 600; }
td.fail { color: #b42318; font-weight: 600; }
.chart { max-width: 720px; margin-top: 1rem; }
.bar { fill: #4a7fb5; }
.bar-value { font-size: 14px; fill: #333; }
.bar-label { font-size: 12px; fill: #555; }
details { background: #fff; border: 1px solid #e0e0e0; border-radius: 4px; margin: 0.5rem 0; padding: 0.5rem 1rem; }
summary { cursor: pointer; font-weight: 600; }
pre { white-space: pre-wrap; font-size: 0.85rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skillforge_core::model::SignalSet;
    use skillforge_core::report::BatchSummary;
    use skillforge_core::results::AssessmentResult;
    use skillforge_core::scoring::CategoryScore;
    use skillforge_core::statistics::cohort_stats;
    use uuid::Uuid;

    fn make_report() -> AssessmentReport {
        let results = vec![AssessmentResult {
            submission_id: "sub-<1>".into(),
            user_id: "u-ada".into(),
            lab_id: "lab-1".into(),
            category_scores: vec![CategoryScore {
                category: Category::Functionality,
                value: 88,
            }],
            signals: SignalSet::default(),
            plagiarism: None,
            final_score: 88,
            passed: true,
            feedback: "feedback with <tags> & ampersands".into(),
            evaluated_at: Utc::now(),
            run_id: Uuid::nil(),
        }];
        AssessmentReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            batch: BatchSummary {
                id: "b1".into(),
                name: "Batch & Co".into(),
                submission_count: 1,
            },
            cohort: cohort_stats(&results),
            results,
            duration_ms: 3,
        }
    }

    #[test]
    fn html_escapes_user_content() {
        let html = generate_html(&make_report());
        assert!(html.contains("sub-&lt;1&gt;"));
        assert!(html.contains("Batch &amp; Co"));
        assert!(html.contains("feedback with &lt;tags&gt; &amp; ampersands"));
        assert!(!html.contains("sub-<1>"));
    }

    #[test]
    fn html_contains_chart_and_table() {
        let html = generate_html(&make_report());
        assert!(html.contains("<svg"));
        assert!(html.contains("functionality"));
        assert!(html.contains("results-table"));
        assert!(html.contains("class=\"pass\""));
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        write_html_report(&make_report(), &path).unwrap();
        assert!(path.exists());
    }
}
