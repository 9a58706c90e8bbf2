//! End-to-end CLI tests against an isolated data directory.

use std::process::Command;

use tempfile::TempDir;

/// Invoke the CLI with its data directory pinned to `dir`.
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_studytrack"))
        .args(args)
        .env("STUDYTRACK_DATA_DIR", dir.path())
        .output()
        .expect("failed to execute CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn run_cli_success(dir: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "CLI failed ({code}) for {args:?}: {stderr}");
    stdout
}

fn run_cli_failure(dir: &TempDir, args: &[&str]) -> String {
    let (_, stderr, code) = run_cli(dir, args);
    assert_ne!(code, 0, "CLI unexpectedly succeeded: {args:?}");
    stderr
}

fn parse_json(s: &str) -> serde_json::Value {
    serde_json::from_str(s).expect("invalid JSON output")
}

#[test]
fn goal_set_and_show_round_trip() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["goal", "set", "120"]);
    let out = parse_json(&run_cli_success(&dir, &["goal", "show"]));
    assert_eq!(out["daily"], 120);
}

#[test]
fn task_lifecycle() {
    let dir = TempDir::new().unwrap();
    let added = parse_json(&run_cli_success(
        &dir,
        &["task", "add", "Rotational mechanics DPP", "physics", "--priority", "high"],
    ));
    let id = added["id"].as_str().unwrap().to_string();

    let list = parse_json(&run_cli_success(&dir, &["task", "list"]));
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["priority"], "high");

    let done = parse_json(&run_cli_success(&dir, &["task", "done", &id]));
    assert_eq!(done["completed"], true);

    run_cli_success(&dir, &["task", "delete", &id]);
    let list = parse_json(&run_cli_success(&dir, &["task", "list"]));
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn manual_log_feeds_stats() {
    let dir = TempDir::new().unwrap();
    let log = parse_json(&run_cli_success(
        &dir,
        &[
            "log",
            "add",
            "chemistry",
            "2024-03-15T10:00:00",
            "2024-03-15T11:30:00",
            "--questions",
            "25",
        ],
    ));
    assert_eq!(log["duration"], 5400);
    assert_eq!(log["questionCount"], 25);

    let list = parse_json(&run_cli_success(&dir, &["log", "list"]));
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn inverted_log_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    let stderr = run_cli_failure(
        &dir,
        &["log", "add", "physics", "2024-03-15T11:00:00", "2024-03-15T10:00:00"],
    );
    assert!(stderr.contains("error"), "stderr: {stderr}");

    let list = parse_json(&run_cli_success(&dir, &["log", "list"]));
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn timer_start_status_pause() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["timer", "start", "physics"]);

    let status = parse_json(&run_cli_success(&dir, &["timer", "status"]));
    assert_eq!(status["physics"]["isRunning"], true);

    run_cli_success(&dir, &["timer", "questions", "physics", "set", "7"]);

    let log = parse_json(&run_cli_success(&dir, &["timer", "pause", "physics"]));
    assert_eq!(log["subject"], "physics");
    assert_eq!(log["questionCount"], 7);

    let status = parse_json(&run_cli_success(&dir, &["timer", "status"]));
    assert_eq!(status["physics"]["isRunning"], false);

    // Double pause is an error now.
    run_cli_failure(&dir, &["timer", "pause", "physics"]);
}

#[test]
fn subject_outside_profile_is_rejected() {
    let dir = TempDir::new().unwrap();
    // Default profile is JEE; botany belongs to NEET.
    run_cli_failure(&dir, &["timer", "start", "botany"]);

    run_cli_success(&dir, &["settings", "exam", "NEET"]);
    run_cli_success(&dir, &["timer", "start", "botany"]);
}

#[test]
fn settings_show_reflects_edits() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["settings", "streak", "--hours", "8", "--questions", "60"]);
    let out = parse_json(&run_cli_success(&dir, &["settings", "show"]));
    assert_eq!(out["streakSettings"]["minStudyHours"], 8.0);
    assert_eq!(out["streakSettings"]["minQuestions"], 60);
    assert_eq!(out["examType"], "JEE");
}

#[test]
fn auth_status_starts_anonymous() {
    let dir = TempDir::new().unwrap();
    let out = parse_json(&run_cli_success(&dir, &["auth", "status"]));
    assert!(out["userId"].is_null());
    assert_eq!(out["remoteConfigured"], false);

    run_cli_success(&dir, &["auth", "login", "user-42"]);
    let out = parse_json(&run_cli_success(&dir, &["auth", "status"]));
    assert_eq!(out["userId"], "user-42");
    // No endpoint configured, so the session stays local.
    let sync = parse_json(&run_cli_success(&dir, &["sync", "status"]));
    assert_eq!(sync["synced"], false);

    run_cli_success(&dir, &["auth", "logout"]);
    let out = parse_json(&run_cli_success(&dir, &["auth", "status"]));
    assert!(out["userId"].is_null());
}

#[test]
fn sync_now_without_identity_fails() {
    let dir = TempDir::new().unwrap();
    run_cli_failure(&dir, &["sync", "now"]);
}

#[test]
fn streak_show_defaults_to_zero() {
    let dir = TempDir::new().unwrap();
    let out = parse_json(&run_cli_success(&dir, &["streak", "show"]));
    assert_eq!(out["currentStreak"], 0);
    assert!(out["lastStudyDate"].is_null());
}
