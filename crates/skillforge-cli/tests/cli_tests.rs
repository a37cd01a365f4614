//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skillforge() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("skillforge").unwrap()
}

/// Scaffold config and samples into a fresh directory.
fn init_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    skillforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    skillforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skillforge.toml"))
        .stdout(predicate::str::contains("Created samples/submissions.toml"))
        .stdout(predicate::str::contains("Created samples/activity.toml"));

    assert!(dir.path().join("skillforge.toml").exists());
    assert!(dir.path().join("samples/submissions.toml").exists());
    assert!(dir.path().join("samples/activity.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = init_dir();

    skillforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_sample_inputs() {
    let dir = init_dir();

    skillforge()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--input")
        .arg("samples")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Submissions"))
        .stdout(predicate::str::contains("sample-activity"))
        .stdout(predicate::str::contains("All inputs valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("empty.toml"),
        r#"
[batch]
id = "empty"
name = "Empty"

[[submissions]]
id = "s1"
user = "u1"
lab = "lab1"
submitted_at = "2026-03-07T10:00:00Z"
"#,
    )
    .unwrap();

    skillforge()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--input")
        .arg("empty.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    skillforge()
        .arg("validate")
        .arg("--input")
        .arg("no_such_file.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn evaluate_sample_batch() {
    let dir = init_dir();

    skillforge()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--submissions")
        .arg("samples/submissions.toml")
        .arg("--output")
        .arg("results")
        .arg("--format")
        .arg("json,markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pass rate"))
        .stdout(predicate::str::contains("Results saved to"))
        .stdout(predicate::str::contains("Markdown report"));

    let reports: Vec<_> = std::fs::read_dir(dir.path().join("results"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().any(|p| p.extension().unwrap() == "json"));
    assert!(reports.iter().any(|p| p.extension().unwrap() == "md"));
}

#[test]
fn evaluate_scores_signal_backed_submission() {
    let dir = init_dir();

    // sub-001 carries execution-backed signals and passes; sub-002 is
    // code-only and scores from derived signals alone.
    skillforge()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--submissions")
        .arg("samples/submissions.toml")
        .arg("--output")
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("sub-001"))
        .stdout(predicate::str::contains("sub-002"));
}

#[test]
fn progress_replays_activity_log() {
    let dir = init_dir();

    skillforge()
        .current_dir(dir.path())
        .arg("progress")
        .arg("--log")
        .arg("samples/activity.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("mastered"))
        .stdout(predicate::str::contains("in_progress"))
        .stdout(predicate::str::contains("370 pts"))
        .stdout(predicate::str::contains("6-day streak"))
        .stdout(predicate::str::contains("122 min on task"));
}

#[test]
fn progress_filters_by_user() {
    let dir = init_dir();

    skillforge()
        .current_dir(dir.path())
        .arg("progress")
        .arg("--log")
        .arg("samples/activity.toml")
        .arg("--user")
        .arg("u-bob")
        .assert()
        .success()
        .stdout(predicate::str::contains("u-bob"))
        .stdout(predicate::str::contains("u-ada").not());
}

#[test]
fn leaderboard_ranks_sample_users() {
    let dir = init_dir();

    let assert = skillforge()
        .current_dir(dir.path())
        .arg("leaderboard")
        .arg("--log")
        .arg("samples/activity.toml")
        .arg("--limit")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("Bob"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let ada_pos = stdout.find("Ada").unwrap();
    let bob_pos = stdout.find("Bob").unwrap();
    assert!(ada_pos < bob_pos, "Ada should rank above Bob");
}

#[test]
fn leaderboard_limit_must_be_positive() {
    let dir = init_dir();

    skillforge()
        .current_dir(dir.path())
        .arg("leaderboard")
        .arg("--log")
        .arg("samples/activity.toml")
        .arg("--limit")
        .arg("0")
        .assert()
        .failure();
}

#[test]
fn evaluate_rejects_bad_config() {
    let dir = init_dir();
    std::fs::write(
        dir.path().join("broken.toml"),
        r#"
[scoring.weights]
functionality = 0.90
code_quality = 0.25
architecture = 0.15
resilience = 0.15
operability = 0.05
"#,
    )
    .unwrap();

    skillforge()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--submissions")
        .arg("samples/submissions.toml")
        .arg("--config")
        .arg("broken.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("weights"));
}

#[test]
fn help_output() {
    skillforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Learner assessment scoring and mastery tracking",
        ));
}

#[test]
fn version_output() {
    skillforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skillforge"));
}
