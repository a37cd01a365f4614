//! The `skillforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create skillforge.toml
    if std::path::Path::new("skillforge.toml").exists() {
        println!("skillforge.toml already exists, skipping.");
    } else {
        std::fs::write("skillforge.toml", SAMPLE_CONFIG)?;
        println!("Created skillforge.toml");
    }

    // Create sample inputs
    std::fs::create_dir_all("samples")?;
    let submissions_path = std::path::Path::new("samples/submissions.toml");
    if submissions_path.exists() {
        println!("samples/submissions.toml already exists, skipping.");
    } else {
        std::fs::write(submissions_path, SAMPLE_SUBMISSIONS)?;
        println!("Created samples/submissions.toml");
    }

    let activity_path = std::path::Path::new("samples/activity.toml");
    if activity_path.exists() {
        println!("samples/activity.toml already exists, skipping.");
    } else {
        std::fs::write(activity_path, SAMPLE_ACTIVITY)?;
        println!("Created samples/activity.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: skillforge validate --input samples");
    println!("  2. Run: skillforge evaluate --submissions samples/submissions.toml");
    println!("  3. Run: skillforge progress --log samples/activity.toml");
    println!("  4. Run: skillforge leaderboard --log samples/activity.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillforge configuration

parallelism = 4

# Score percentage required for mastery at full completion.
mastery_threshold = 90.0

[scoring]
pass_threshold = 75
plagiarism_threshold = 0.75
plagiarism_penalty = 50

[scoring.weights]
functionality = 0.40
code_quality = 0.25
architecture = 0.15
resilience = 0.15
operability = 0.05
"#;

const SAMPLE_SUBMISSIONS: &str = r#"[batch]
id = "sample-batch"
name = "Sample Submissions"
description = "Two lab submissions to get started"

# A submission with execution-backed signals from the grading pipeline.
[[submissions]]
id = "sub-001"
user = "u-ada"
lab = "lab-payments"
skill = "backend-services"
submitted_at = "2026-03-07T10:00:00Z"
code = """
pub struct PaymentController;
pub struct PaymentService;
pub struct PaymentRepository;

/// Charge a card with retry, timeout, and fallback handling.
pub async fn charge(req: ChargeRequest) -> Result<Receipt, ChargeError> {
    let breaker = CircuitBreaker::default();
    let response = breaker.call(client.post(URL).timeout(TIMEOUT).send()).await;
    match response {
        Ok(r) => Ok(r.json().await?),
        Err(e) => {
            tracing::error!("charge failed, falling back: {e}");
            fallback_charge(req).await
        }
    }
}

#[get("/health")]
async fn health() -> &'static str { "ok" }

#[test]
fn charge_succeeds() {}
"""

[submissions.signals.functionality]
tests_passed = 18
tests_total = 20
coverage = 0.85
endpoints_working = 5
endpoints_total = 5

[submissions.signals.code_quality]
bugs = 1
vulnerabilities = 0
code_smells = 4
duplication_pct = 4.0

[submissions.signals.architecture]
design_patterns = ["repository", "service layer"]
has_layering = true
has_dependency_injection = true
api_design = 80

[submissions.signals.resilience]
has_circuit_breaker = true
has_retry = true
has_timeout = true
has_fallback = true
error_handling = 75

[submissions.signals.operability]
has_metrics = true
has_health_checks = true
logging = 70
documentation = 60

# A code-only submission; signals are derived by the static analyzer.
[[submissions]]
id = "sub-002"
user = "u-bob"
lab = "lab-payments"
skill = "backend-services"
submitted_at = "2026-03-07T11:30:00Z"
code = """
pub fn charge(amount: u32) -> u32 {
    // TODO handle declined cards
    amount
}
"""
"#;

const SAMPLE_ACTIVITY: &str = r#"[log]
id = "sample-activity"
name = "Sample Activity Log"

[users]
u-ada = "Ada"
u-bob = "Bob"

[totals.backend-services]
modules = 4
lessons = 12
labs = 4
quizzes = 4
points_possible = 400

[[events]]
user = "u-ada"
kind = "module_completed"
entity = "mod-1"
entity_kind = "module"
skill = "backend-services"
timestamp = "2026-03-01T10:00:00Z"

[[events]]
user = "u-ada"
kind = "quiz_passed"
entity = "quiz-1"
entity_kind = "quiz"
skill = "backend-services"
points = 95
time_spent_minutes = 15
timestamp = "2026-03-02T10:00:00Z"

[[events]]
user = "u-ada"
kind = "module_completed"
entity = "mod-2"
entity_kind = "module"
skill = "backend-services"
timestamp = "2026-03-03T10:00:00Z"

[[events]]
user = "u-ada"
kind = "lab_passed"
entity = "lab-1"
entity_kind = "lab"
skill = "backend-services"
points = 90
time_spent_minutes = 55
timestamp = "2026-03-04T10:00:00Z"

[[events]]
user = "u-ada"
kind = "module_completed"
entity = "mod-3"
entity_kind = "module"
skill = "backend-services"
timestamp = "2026-03-05T09:00:00Z"

[[events]]
user = "u-ada"
kind = "quiz_passed"
entity = "quiz-2"
entity_kind = "quiz"
skill = "backend-services"
points = 95
time_spent_minutes = 12
timestamp = "2026-03-05T17:00:00Z"

[[events]]
user = "u-ada"
kind = "lab_passed"
entity = "lab-2"
entity_kind = "lab"
skill = "backend-services"
points = 90
time_spent_minutes = 40
timestamp = "2026-03-06T10:00:00Z"

[[events]]
user = "u-ada"
kind = "module_completed"
entity = "mod-4"
entity_kind = "module"
skill = "backend-services"
timestamp = "2026-03-06T15:00:00Z"

[[events]]
user = "u-bob"
kind = "module_completed"
entity = "mod-1"
entity_kind = "module"
skill = "backend-services"
timestamp = "2026-03-04T14:00:00Z"

[[events]]
user = "u-bob"
kind = "quiz_passed"
entity = "quiz-1"
entity_kind = "quiz"
skill = "backend-services"
points = 60
time_spent_minutes = 20
timestamp = "2026-03-05T14:00:00Z"
"#;
