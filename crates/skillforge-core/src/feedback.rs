//! Deterministic feedback generation.
//!
//! Feedback is a pure function of the assessment outcome: the same scores,
//! signals, and verdict always render the same text. Sections appear in
//! fixed category order, followed by the plagiarism notice (when flagged)
//! and a recommendation tier selected by the final score.

use std::fmt::Write;

use crate::model::{Category, SignalSet};
use crate::plagiarism::PlagiarismResult;
use crate::scoring::CategoryScore;

/// Render the full feedback document for one assessment.
pub fn generate_feedback(
    scores: &[CategoryScore],
    signals: &SignalSet,
    plagiarism: Option<&PlagiarismResult>,
    final_score: u32,
    passed: bool,
) -> String {
    let mut out = String::new();

    out.push_str("## Assessment Summary\n");
    let _ = writeln!(out, "Final Score: {final_score}/100");
    let _ = writeln!(
        out,
        "Status: {}\n",
        if passed { "PASSED" } else { "NEEDS IMPROVEMENT" }
    );

    for score in scores {
        match score.category {
            Category::Functionality => functionality_section(&mut out, score, signals),
            Category::CodeQuality => code_quality_section(&mut out, score, signals),
            Category::Architecture => architecture_section(&mut out, score, signals),
            Category::Resilience => resilience_section(&mut out, score, signals),
            Category::Operability => operability_section(&mut out, score, signals),
        }
    }

    if let Some(p) = plagiarism {
        if p.detected {
            plagiarism_section(&mut out, p);
        }
    }

    recommendations_section(&mut out, final_score);

    out
}

fn check(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn functionality_section(out: &mut String, score: &CategoryScore, signals: &SignalSet) {
    out.push_str("### Functionality (40% weight)\n");
    let _ = writeln!(out, "Score: {}/100", score.value);
    if let Some(s) = &signals.functionality {
        let pct = if s.tests_total > 0 {
            100.0 * f64::from(s.tests_passed) / f64::from(s.tests_total)
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "Tests: {}/{} passed ({pct:.1}%)",
            s.tests_passed, s.tests_total
        );
        let _ = writeln!(out, "Coverage: {:.1}%", s.coverage * 100.0);
        let _ = writeln!(
            out,
            "Endpoints: {}/{} working",
            s.endpoints_working, s.endpoints_total
        );
    }
    if score.value < 70 {
        out.push_str("Improvement needed: focus on making all tests pass and raising coverage.\n");
    } else if score.value >= 90 {
        out.push_str("Excellent: strong functional implementation.\n");
    }
    out.push('\n');
}

fn code_quality_section(out: &mut String, score: &CategoryScore, signals: &SignalSet) {
    out.push_str("### Code Quality (25% weight)\n");
    let _ = writeln!(out, "Score: {}/100", score.value);
    if let Some(s) = &signals.code_quality {
        let _ = writeln!(out, "Bugs: {}", s.bugs);
        let _ = writeln!(out, "Vulnerabilities: {}", s.vulnerabilities);
        let _ = writeln!(out, "Code smells: {}", s.code_smells);
        let _ = writeln!(out, "Duplication: {:.1}%", s.duplication_pct);
        if s.bugs > 0 {
            out.push_str("Fix bugs: address the identified bug patterns.\n");
        }
        if s.vulnerabilities > 0 {
            out.push_str("Security: review and fix the flagged vulnerabilities.\n");
        }
        if s.duplication_pct > 10.0 {
            out.push_str("Refactor: reduce duplication through better abstractions.\n");
        }
    }
    out.push('\n');
}

fn architecture_section(out: &mut String, score: &CategoryScore, signals: &SignalSet) {
    out.push_str("### Architecture (15% weight)\n");
    let _ = writeln!(out, "Score: {}/100", score.value);
    if let Some(s) = &signals.architecture {
        let patterns = if s.design_patterns.is_empty() {
            "none detected".to_string()
        } else {
            s.design_patterns.join(", ")
        };
        let _ = writeln!(out, "Design patterns: {patterns}");
        let _ = writeln!(out, "Layer separation: {}", check(s.has_layering));
        let _ = writeln!(
            out,
            "Dependency injection: {}",
            check(s.has_dependency_injection)
        );
    }
    if score.value < 60 {
        out.push_str("Consider introducing proper layering and established design patterns.\n");
    }
    out.push('\n');
}

fn resilience_section(out: &mut String, score: &CategoryScore, signals: &SignalSet) {
    out.push_str("### Resilience (15% weight)\n");
    let _ = writeln!(out, "Score: {}/100", score.value);
    if let Some(s) = &signals.resilience {
        let _ = writeln!(out, "Circuit breaker: {}", check(s.has_circuit_breaker));
        let _ = writeln!(out, "Retry logic: {}", check(s.has_retry));
        let _ = writeln!(out, "Timeout handling: {}", check(s.has_timeout));
        let _ = writeln!(out, "Fallback mechanisms: {}", check(s.has_fallback));
    }
    if score.value < 50 {
        out.push_str("Implement error-handling patterns for production readiness.\n");
    }
    out.push('\n');
}

fn operability_section(out: &mut String, score: &CategoryScore, signals: &SignalSet) {
    out.push_str("### Operability (5% weight)\n");
    let _ = writeln!(out, "Score: {}/100", score.value);
    if let Some(s) = &signals.operability {
        let _ = writeln!(out, "Metrics: {}", check(s.has_metrics));
        let _ = writeln!(out, "Health checks: {}", check(s.has_health_checks));
        let _ = writeln!(out, "Logging quality: {}/100", s.logging);
        let _ = writeln!(out, "Documentation: {}/100", s.documentation);
    }
    out.push('\n');
}

fn plagiarism_section(out: &mut String, result: &PlagiarismResult) {
    out.push_str("### Plagiarism Detected\n");
    let _ = writeln!(out, "Similarity: {:.1}%", result.similarity * 100.0);
    out.push_str("This submission shows significant similarity to existing code.\n");
    out.push_str("Please ensure all work is original and properly attributed.\n\n");
}

fn recommendations_section(out: &mut String, final_score: u32) {
    out.push_str("### Recommendations\n");
    if final_score < 60 {
        out.push_str("- Focus on core functionality first\n");
        out.push_str("- Revisit the module fundamentals before resubmitting\n");
        out.push_str("- Practice test-driven development\n");
    } else if final_score < 80 {
        out.push_str("- Improve code quality and architecture\n");
        out.push_str("- Study established design patterns\n");
        out.push_str("- Add comprehensive error handling\n");
    } else {
        out.push_str("- Excellent work, consider advanced topics:\n");
        out.push_str("- Distributed system patterns\n");
        out.push_str("- Performance optimization\n");
        out.push_str("- Advanced security hardening\n");
    }
}
