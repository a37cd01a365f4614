//! Category scoring formulas and the weighted scoring configuration.
//!
//! Each of the five categories has an independent formula over its raw
//! signals. Every formula saturates into `[0, 100]` rather than erroring on
//! extreme inputs, so a score is always produced from whatever signals are
//! available.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{
    ArchitectureSignals, Category, CodeQualitySignals, FunctionalitySignals, OperabilitySignals,
    ResilienceSignals, SignalSet,
};
use crate::plagiarism::PlagiarismResult;

/// A single category's score on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub value: u32,
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

fn clamp_score(value: f64) -> u32 {
    value.clamp(0.0, 100.0) as u32
}

/// Functionality: 70% tests, 20% coverage, 10% working endpoints.
pub fn score_functionality(signals: &FunctionalitySignals) -> CategoryScore {
    let test_term = ratio(signals.tests_passed, signals.tests_total) * 100.0 * 0.70;
    let coverage_term = signals.coverage.clamp(0.0, 1.0) * 100.0 * 0.20;
    let endpoint_term = ratio(signals.endpoints_working, signals.endpoints_total) * 100.0 * 0.10;

    CategoryScore {
        category: Category::Functionality,
        value: clamp_score(test_term + coverage_term + endpoint_term),
    }
}

/// Code quality: start from 100 and subtract capped penalties per metric.
pub fn score_code_quality(signals: &CodeQualitySignals) -> CategoryScore {
    let bug_penalty = i64::from(signals.bugs) * 5;
    let vuln_penalty = i64::from(signals.vulnerabilities) * 10;
    let smell_penalty = i64::from(signals.code_smells) * 2;
    // Duplication under 5% is free; each point above costs 3, capped at 15.
    let dup_penalty = ((signals.duplication_pct - 5.0).max(0.0) as i64) * 3;

    let value = 100
        - bug_penalty.min(30)
        - vuln_penalty.min(20)
        - smell_penalty.min(25)
        - dup_penalty.min(15);

    CategoryScore {
        category: Category::CodeQuality,
        value: value.max(0) as u32,
    }
}

/// Architecture: additive credit for patterns, layering, DI, API design.
pub fn score_architecture(signals: &ArchitectureSignals) -> CategoryScore {
    let mut value = signals.design_patterns.len() as u32 * 15;
    if signals.has_layering {
        value += 20;
    }
    if signals.has_dependency_injection {
        value += 15;
    }
    value += signals.api_design.min(20);

    CategoryScore {
        category: Category::Architecture,
        value: value.min(100),
    }
}

/// Resilience: additive credit for fault-tolerance patterns.
pub fn score_resilience(signals: &ResilienceSignals) -> CategoryScore {
    let mut value = 0;
    if signals.has_circuit_breaker {
        value += 25;
    }
    if signals.has_retry {
        value += 20;
    }
    if signals.has_timeout {
        value += 20;
    }
    if signals.has_fallback {
        value += 15;
    }
    value += signals.error_handling.min(20);

    CategoryScore {
        category: Category::Resilience,
        value: value.min(100),
    }
}

/// Operability: metrics, health checks, logging, documentation.
pub fn score_operability(signals: &OperabilitySignals) -> CategoryScore {
    let mut value = 0;
    if signals.has_metrics {
        value += 30;
    }
    if signals.has_health_checks {
        value += 25;
    }
    value += signals.logging.min(25);
    value += signals.documentation.min(20);

    CategoryScore {
        category: Category::Operability,
        value: value.min(100),
    }
}

/// Score every category present in the signal set, in report order.
pub fn score_all(signals: &SignalSet) -> Vec<CategoryScore> {
    let mut scores = Vec::new();
    if let Some(s) = &signals.functionality {
        scores.push(score_functionality(s));
    }
    if let Some(s) = &signals.code_quality {
        scores.push(score_code_quality(s));
    }
    if let Some(s) = &signals.architecture {
        scores.push(score_architecture(s));
    }
    if let Some(s) = &signals.resilience {
        scores.push(score_resilience(s));
    }
    if let Some(s) = &signals.operability {
        scores.push(score_operability(s));
    }
    scores
}

/// The fixed weight of each category in the final score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub functionality: f64,
    pub code_quality: f64,
    pub architecture: f64,
    pub resilience: f64,
    pub operability: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            functionality: 0.40,
            code_quality: 0.25,
            architecture: 0.15,
            resilience: 0.15,
            operability: 0.05,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Functionality => self.functionality,
            Category::CodeQuality => self.code_quality,
            Category::Architecture => self.architecture,
            Category::Resilience => self.resilience,
            Category::Operability => self.operability,
        }
    }

    fn sum(&self) -> f64 {
        Category::ALL.iter().map(|&c| self.weight(c)).sum()
    }
}

/// Scoring thresholds and weights, validated before any scoring occurs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: CategoryWeights,
    /// Minimum final score to pass, before any plagiarism penalty.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
    /// Similarity above which plagiarism is flagged.
    #[serde(default = "default_plagiarism_threshold")]
    pub plagiarism_threshold: f64,
    /// Points subtracted from the final score when plagiarism is flagged.
    #[serde(default = "default_plagiarism_penalty")]
    pub plagiarism_penalty: u32,
}

fn default_pass_threshold() -> u32 {
    75
}

fn default_plagiarism_threshold() -> f64 {
    0.75
}

fn default_plagiarism_penalty() -> u32 {
    50
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            pass_threshold: default_pass_threshold(),
            plagiarism_threshold: default_plagiarism_threshold(),
            plagiarism_penalty: default_plagiarism_penalty(),
        }
    }
}

impl ScoringConfig {
    /// Validate the configuration. Called once at engine construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let value = self.weights.weight(category);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightRange { category, value });
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::WeightSum { actual: sum });
        }
        if self.pass_threshold > 100 {
            return Err(ConfigError::PassThreshold(self.pass_threshold));
        }
        if !(0.0..=1.0).contains(&self.plagiarism_threshold) {
            return Err(ConfigError::PlagiarismThreshold(self.plagiarism_threshold));
        }
        if self.plagiarism_penalty > 100 {
            return Err(ConfigError::PlagiarismPenalty(self.plagiarism_penalty));
        }
        Ok(())
    }
}

/// Combine category scores and the plagiarism verdict into the final
/// score and pass/fail decision.
///
/// Missing categories are simply omitted from the weighted sum. The pass
/// decision is taken before the plagiarism penalty; a detected plagiarism
/// then floors the score by the penalty and fails the submission
/// unconditionally.
pub fn combine_scores(
    scores: &[CategoryScore],
    plagiarism: Option<&PlagiarismResult>,
    config: &ScoringConfig,
) -> (u32, bool) {
    let weighted: f64 = scores
        .iter()
        .map(|s| config.weights.weight(s.category) * f64::from(s.value))
        .sum();
    let mut final_score = weighted.floor() as u32;
    let mut passed = final_score >= config.pass_threshold;

    if plagiarism.is_some_and(|p| p.detected) {
        final_score = final_score.saturating_sub(config.plagiarism_penalty);
        passed = false;
    }

    (final_score, passed)
}
