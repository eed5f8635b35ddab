//! Integration tests for the `ladder` binary

use std::path::Path;
use std::process::Command;

/// Path to the compiled ladder binary
fn ladder_bin() -> String {
    env!("CARGO_BIN_EXE_ladder").to_string()
}

/// Run `ladder` in `dir` and return (stdout, stderr, exit code).
fn run_ladder(dir: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(ladder_bin())
        .arg("--project-dir")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute ladder with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code(),
    )
}

fn installation() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("ladder.yml"),
        "name: cli-test\ndatabase:\n  type: duckdb\n  path: ladder.duckdb\nmigration:\n  batch_size: 10\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_migrate_then_noop() {
    let dir = installation();

    let (stdout, stderr, code) = run_ladder(dir.path(), &["migrate"]);
    assert_eq!(code, Some(0), "stderr: {stderr}");
    assert!(stdout.contains("Applied 10 migration steps"), "stdout: {stdout}");
    assert!(stderr.contains("#1 'Create initial schema'"), "stderr: {stderr}");
    assert!(dir.path().join("ladder.duckdb").exists());

    let (stdout, _, code) = run_ladder(dir.path(), &["migrate"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("Database is up to date"), "stdout: {stdout}");
}

#[test]
fn test_migrate_json_summary() {
    let dir = installation();

    let (stdout, stderr, code) = run_ladder(dir.path(), &["migrate", "--output", "json"]);
    assert_eq!(code, Some(0), "stderr: {stderr}");
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["applied"].as_array().map(Vec::len), Some(10));
    assert_eq!(summary["applied"][0], 1);
    assert!(summary["elapsed_ms"].is_u64());

    let (stdout, _, code) = run_ladder(dir.path(), &["migrate", "-o", "json"]);
    assert_eq!(code, Some(0));
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["applied"], serde_json::json!([]));
}

#[test]
fn test_status_check_and_json() {
    let dir = installation();

    let (stdout, _, code) = run_ladder(dir.path(), &["status", "--check"]);
    assert_eq!(code, Some(1));
    assert!(stdout.contains("Status: fresh install"), "stdout: {stdout}");

    run_ladder(dir.path(), &["migrate"]);

    let (stdout, stderr, code) = run_ladder(dir.path(), &["status", "--output", "json"]);
    assert_eq!(code, Some(0), "stderr: {stderr}");
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["status"], "up_to_date");
    assert_eq!(report["last_applied"], 10);
    assert_eq!(report["latest"], 10);
}

#[test]
fn test_plan_and_history() {
    let dir = installation();

    let (stdout, _, code) = run_ladder(dir.path(), &["plan", "-o", "json"]);
    assert_eq!(code, Some(0));
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(plan.as_array().unwrap().len(), 10);
    assert_eq!(plan[1]["kind"], "data");

    let (stdout, _, _) = run_ladder(dir.path(), &["history"]);
    assert!(stdout.contains("No migration step applied yet"));

    run_ladder(dir.path(), &["migrate"]);

    let (stdout, _, _) = run_ladder(dir.path(), &["plan"]);
    assert!(stdout.contains("Nothing to migrate"));

    let (stdout, _, code) = run_ladder(dir.path(), &["history", "--output", "json"]);
    assert_eq!(code, Some(0));
    let records: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 10);
    assert_eq!(records[9]["step_id"], 10);
}

#[test]
fn test_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_ladder(dir.path(), &["status"]);
    assert_ne!(code, Some(0));
    assert!(stderr.contains("Failed to load ladder.yml"), "stderr: {stderr}");
}
