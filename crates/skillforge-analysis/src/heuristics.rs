//! Marker-based signal derivation from submission source text.
//!
//! These heuristics are language-agnostic line scans. Counts that would
//! need real execution (tests passed, endpoints responding) are estimated
//! from the discovered totals; bundles carrying execution-backed signals
//! bypass this analyzer entirely.

use async_trait::async_trait;

use skillforge_core::model::{
    ArchitectureSignals, CodeQualitySignals, FunctionalitySignals, OperabilitySignals,
    ResilienceSignals, SignalSet,
};
use skillforge_core::traits::{AnalyzeRequest, CodeAnalyzer};

/// Deterministic static analyzer over raw submission text.
#[derive(Debug, Default)]
pub struct StaticAnalyzer;

impl StaticAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CodeAnalyzer for StaticAnalyzer {
    fn name(&self) -> &str {
        "static"
    }

    async fn derive_signals(&self, request: &AnalyzeRequest) -> anyhow::Result<SignalSet> {
        let code = request.code.as_str();
        if code.trim().is_empty() {
            tracing::debug!(submission = %request.submission_id, "no code to analyze");
            return Ok(SignalSet::default());
        }

        let signals = SignalSet {
            functionality: Some(functionality_signals(code)),
            code_quality: Some(code_quality_signals(code)),
            architecture: Some(architecture_signals(code)),
            resilience: Some(resilience_signals(code)),
            operability: Some(operability_signals(code)),
        };
        tracing::debug!(
            submission = %request.submission_id,
            categories = signals.present_categories().len(),
            "derived signals from source"
        );
        Ok(signals)
    }
}

fn count_lines_containing(code: &str, markers: &[&str]) -> u32 {
    code.lines()
        .filter(|line| markers.iter().any(|m| line.contains(m)))
        .count() as u32
}

const TEST_MARKERS: &[&str] = &["#[test]", "#[tokio::test]", "@Test", "def test_", "it("];
const ENDPOINT_MARKERS: &[&str] = &[
    "@GetMapping",
    "@PostMapping",
    "@PutMapping",
    "@DeleteMapping",
    "app.get(",
    "app.post(",
    "#[get(",
    "#[post(",
];

fn functionality_signals(code: &str) -> FunctionalitySignals {
    let tests_total = count_lines_containing(code, TEST_MARKERS);
    let endpoints_total = count_lines_containing(code, ENDPOINT_MARKERS);
    let total_lines = code.lines().count().max(1) as u32;

    // Static estimates; execution results land here when the lab runner
    // has actually run the suite.
    FunctionalitySignals {
        tests_passed: tests_total * 4 / 5,
        tests_total,
        coverage: f64::from(tests_total * 10).min(f64::from(total_lines)) / f64::from(total_lines),
        endpoints_working: endpoints_total * 9 / 10,
        endpoints_total,
    }
}

fn code_quality_signals(code: &str) -> CodeQualitySignals {
    let lower = code.to_lowercase();

    let mut bugs = 0;
    if lower.contains("null.") {
        bugs += 1;
    }
    if lower.contains("== null") && !lower.contains("!= null") {
        bugs += 1;
    }
    bugs += count_lines_containing(code, &["FIXME"]);

    let mut vulnerabilities = 0;
    if (lower.contains("select ") || lower.contains("insert into"))
        && !lower.contains("preparedstatement")
        && !lower.contains("bind(")
    {
        vulnerabilities += 1;
    }
    if lower.contains("eval(") {
        vulnerabilities += 1;
    }
    if lower.contains("password = \"") || lower.contains("api_key = \"") {
        vulnerabilities += 1;
    }

    let long_lines = code.lines().filter(|l| l.len() > 120).count() as u32;
    let todo_lines = count_lines_containing(code, &["TODO"]);
    let deep_nesting = code
        .lines()
        .filter(|l| l.starts_with("                ") && !l.trim().is_empty())
        .count() as u32;
    let code_smells = long_lines + todo_lines + deep_nesting;

    CodeQualitySignals {
        bugs,
        vulnerabilities,
        code_smells,
        duplication_pct: duplication_percentage(code),
    }
}

/// Share of substantial lines whose normalized text repeats elsewhere.
fn duplication_percentage(code: &str) -> f64 {
    let normalized: Vec<&str> = code
        .lines()
        .map(str::trim)
        .filter(|l| l.len() >= 10)
        .collect();
    if normalized.is_empty() {
        return 0.0;
    }

    let mut counts = std::collections::HashMap::new();
    for line in &normalized {
        *counts.entry(*line).or_insert(0u32) += 1;
    }
    let duplicated: u32 = counts.values().filter(|&&c| c > 1).map(|&c| c - 1).sum();

    f64::from(duplicated) / normalized.len() as f64 * 100.0
}

fn architecture_signals(code: &str) -> ArchitectureSignals {
    let lower = code.to_lowercase();

    let mut design_patterns = Vec::new();
    if code.contains("Service") {
        design_patterns.push("service layer".to_string());
    }
    if code.contains("Repository") {
        design_patterns.push("repository".to_string());
    }
    if code.contains("Controller") {
        design_patterns.push("mvc".to_string());
    }
    if code.contains("Factory") {
        design_patterns.push("factory".to_string());
    }
    if code.contains("Builder") {
        design_patterns.push("builder".to_string());
    }

    let has_layering = code.contains("Controller") && code.contains("Service") && code.contains("Repository");
    let has_dependency_injection =
        code.contains("@Autowired") || code.contains("@Inject") || lower.contains("inject");

    let mut api_design = 0;
    if lower.contains("restcontroller") || lower.contains("router") {
        api_design += 25;
    }
    if lower.contains("requestmapping") || lower.contains("route") {
        api_design += 25;
    }
    if lower.contains("responseentity") || lower.contains("response") {
        api_design += 25;
    }
    if lower.contains("@valid") || lower.contains("validate") {
        api_design += 25;
    }

    ArchitectureSignals {
        design_patterns,
        has_layering,
        has_dependency_injection,
        api_design,
    }
}

fn resilience_signals(code: &str) -> ResilienceSignals {
    let lower = code.to_lowercase();

    let mut error_handling = 0;
    if lower.contains("try") {
        error_handling += 25;
    }
    if lower.contains("catch") || lower.contains("except") || code.contains("Result<") {
        error_handling += 25;
    }
    if lower.contains("throw") || lower.contains("raise") || code.contains("Err(") {
        error_handling += 25;
    }
    if lower.contains("exceptionhandler") || lower.contains("recover") {
        error_handling += 25;
    }

    ResilienceSignals {
        has_circuit_breaker: lower.contains("circuitbreaker") || lower.contains("circuit_breaker"),
        has_retry: lower.contains("retry"),
        has_timeout: lower.contains("timeout"),
        has_fallback: lower.contains("fallback"),
        error_handling,
    }
}

fn operability_signals(code: &str) -> OperabilitySignals {
    let lower = code.to_lowercase();

    let mut logging = 0;
    if lower.contains("logger") || lower.contains("log::") || lower.contains("tracing") {
        logging += 30;
    }
    if lower.contains(".info") {
        logging += 20;
    }
    if lower.contains(".error") {
        logging += 25;
    }
    if lower.contains(".debug") {
        logging += 25;
    }

    let mut documentation = 0;
    if code.contains("/**") || code.contains("///") {
        documentation += 40;
    }
    if lower.contains("readme") {
        documentation += 30;
    }
    if lower.contains("openapi") || lower.contains("swagger") {
        documentation += 30;
    }

    OperabilitySignals {
        has_metrics: lower.contains("metrics") || lower.contains("prometheus") || code.contains("@Timed"),
        has_health_checks: lower.contains("health"),
        logging: logging.min(100),
        documentation: documentation.min(100),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RICH_SUBMISSION: &str = r#"
/// Payment service with retries and a circuit breaker.
pub struct PaymentController;
pub struct PaymentService;
pub struct PaymentRepository;

#[get("/health")]
async fn health() -> &'static str { "ok" }

#[get("/metrics")]
async fn metrics() -> String { prometheus::gather() }

async fn charge() -> Result<Receipt, ChargeError> {
    let breaker = CircuitBreaker::default();
    let response = breaker.call(client.post(url).timeout(TIMEOUT).send()).await;
    match response {
        Ok(r) => Ok(r.json().await?),
        Err(e) => {
            tracing::error!("charge failed, falling back: {e}");
            retry_with_fallback().await
        }
    }
}

#[test]
fn charge_succeeds() {}

#[test]
fn charge_retries_on_timeout() {}
"#;

    fn request(code: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            submission_id: "sub-test".into(),
            code: code.into(),
        }
    }

    #[tokio::test]
    async fn empty_code_yields_no_signals() {
        let analyzer = StaticAnalyzer::new();
        let signals = analyzer.derive_signals(&request("   \n  ")).await.unwrap();
        assert!(signals.is_empty());
    }

    #[tokio::test]
    async fn rich_submission_sets_flags() {
        let analyzer = StaticAnalyzer::new();
        let signals = analyzer
            .derive_signals(&request(RICH_SUBMISSION))
            .await
            .unwrap();

        let functionality = signals.functionality.unwrap();
        assert_eq!(functionality.tests_total, 2);
        assert_eq!(functionality.endpoints_total, 2);

        let resilience = signals.resilience.unwrap();
        assert!(resilience.has_retry);
        assert!(resilience.has_timeout);
        assert!(resilience.has_fallback);
        assert!(resilience.has_circuit_breaker);
        assert!(resilience.error_handling > 0);

        let operability = signals.operability.unwrap();
        assert!(operability.has_metrics);
        assert!(operability.has_health_checks);
        assert!(operability.logging > 0);
        assert!(operability.documentation > 0);

        let architecture = signals.architecture.unwrap();
        assert!(architecture.has_layering);
        assert!(architecture
            .design_patterns
            .contains(&"repository".to_string()));
    }

    #[tokio::test]
    async fn analysis_is_deterministic() {
        let analyzer = StaticAnalyzer::new();
        let a = analyzer
            .derive_signals(&request(RICH_SUBMISSION))
            .await
            .unwrap();
        let b = analyzer
            .derive_signals(&request(RICH_SUBMISSION))
            .await
            .unwrap();
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn duplication_counts_repeated_lines() {
        let code = "let total = accumulate(items);\nlet total = accumulate(items);\nlet other = 1;\nlet unrelated_line = compute();\n";
        let pct = duplication_percentage(code);
        // One repeat among three substantial lines.
        assert!(pct > 0.0 && pct < 100.0);

        assert_eq!(duplication_percentage(""), 0.0);
    }

    #[test]
    fn quality_signals_flag_suspect_code() {
        let code = "query = \"SELECT * FROM users WHERE id = \" + id;\neval(input);\nif (user == null) { }\n// TODO handle errors\n";
        let signals = code_quality_signals(code);
        assert!(signals.vulnerabilities >= 2);
        assert!(signals.bugs >= 1);
        assert!(signals.code_smells >= 1);
    }
}
