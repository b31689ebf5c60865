//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pullfocus"))
        .args(args)
        .env("PULLFOCUS_DATA_DIR", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout should be JSON")
}

#[test]
fn test_fresh_status() {
    let dir = tempfile::tempdir().unwrap();
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["timer"]["mode"], "focus");
    assert_eq!(status["timer"]["status"], "idle");
    assert_eq!(status["timer"]["remaining_seconds"], 1500);
    assert_eq!(status["timer"]["formatted"], "25:00");
    assert_eq!(status["snapshot"]["cyclesCount"], 0);
    assert!(status["lastSession"].is_null());
    assert!(dir.path().join("config.toml").exists());
    assert!(dir.path().join("pullfocus.db").exists());
}

#[test]
fn test_start_persists_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let started = run_json(dir.path(), &["timer", "start"]);
    assert_eq!(started["event"]["type"], "timer_started");
    assert_eq!(started["timer"]["status"], "running");

    let again = run_json(dir.path(), &["timer", "start"]);
    assert!(again["event"].is_null());

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["timer"]["status"], "running");
    assert!(status["snapshot"]["startedAt"].is_i64());
}

#[test]
fn test_pause_when_idle_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let paused = run_json(dir.path(), &["timer", "pause"]);
    assert!(paused["event"].is_null());
    assert_eq!(paused["timer"]["status"], "idle");
}

#[test]
fn test_mode_change() {
    let dir = tempfile::tempdir().unwrap();
    let changed = run_json(dir.path(), &["timer", "mode", "long-break"]);
    assert_eq!(changed["event"]["type"], "mode_changed");
    assert_eq!(changed["timer"]["mode"], "long-break");
    assert_eq!(changed["timer"]["remaining_seconds"], 900);
}

#[test]
fn test_unknown_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["timer", "mode", "nap"]);
    assert_ne!(code, 0);
}

#[test]
fn test_settings_resync_idle_timer() {
    let dir = tempfile::tempdir().unwrap();
    let updated = run_json(dir.path(), &["settings", "set", "--focus", "30"]);
    assert_eq!(updated["type"], "settings_updated");
    assert_eq!(updated["settings"]["focusDuration"], 30);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["timer"]["remaining_seconds"], 1800);

    let shown = run_json(dir.path(), &["settings", "show"]);
    assert_eq!(shown["focusDuration"], 30);
    assert_eq!(shown["shortBreakDuration"], 5);
}

#[test]
fn test_zero_duration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["settings", "set", "--round-interval", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("roundInterval"), "stderr: {stderr}");

    let shown = run_json(dir.path(), &["settings", "show"]);
    assert_eq!(shown["roundInterval"], 4);
}

#[test]
fn test_skip_logs_session() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["timer", "start"]);
    let next = run_json(dir.path(), &["timer", "next"]);
    assert_eq!(next["timer"]["mode"], "short-break");
    assert_eq!(next["timer"]["status"], "idle");

    let sessions = run_json(dir.path(), &["sessions", "list"]);
    let list = sessions.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["type"], "focus");
    assert_eq!(list[0]["status"], "skipped");
    assert_eq!(list[0]["durationMinutes"], 1);

    let today = run_json(dir.path(), &["sessions", "today"]);
    assert_eq!(today["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(today["totalFocusMinutes"], 0);

    let grouped = run_json(dir.path(), &["sessions", "grouped"]);
    assert_eq!(grouped.as_array().unwrap().len(), 1);

    let id = list[0]["id"].as_i64().unwrap();
    let removed = run_json(dir.path(), &["sessions", "remove", &id.to_string()]);
    assert_eq!(removed["removed"], true);
    let again = run_json(dir.path(), &["sessions", "remove", &id.to_string()]);
    assert_eq!(again["removed"], false);

    let sessions = run_json(dir.path(), &["sessions", "list"]);
    assert!(sessions.as_array().unwrap().is_empty());
}

#[test]
fn test_next_without_logging() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["timer", "start"]);
    run_json(dir.path(), &["timer", "next", "--no-log"]);
    let sessions = run_json(dir.path(), &["sessions", "list"]);
    assert!(sessions.as_array().unwrap().is_empty());
}

#[test]
fn test_full_reset_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["settings", "set", "--long-break", "20"]);
    run_json(dir.path(), &["timer", "mode", "long-break"]);

    let (_, stderr, code) = run_cli(dir.path(), &["timer", "full-reset"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--yes"));

    let reset = run_json(dir.path(), &["timer", "full-reset", "--yes"]);
    assert_eq!(reset["event"]["type"], "full_reset");
    assert_eq!(reset["timer"]["mode"], "focus");
    assert_eq!(reset["timer"]["remaining_seconds"], 1500);

    let shown = run_json(dir.path(), &["settings", "show"]);
    assert_eq!(shown["longBreakDuration"], 15);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "storage.backend"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "sqlite");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "logging.filter", "debug"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "logging.filter"]);
    assert_eq!(stdout.trim(), "debug");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "storage.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("storage.nope"));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
}

#[test]
fn test_memory_backend_forgets_state() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "storage.backend", "memory"]);
    assert_eq!(code, 0);

    run_json(dir.path(), &["timer", "start"]);
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["timer"]["status"], "idle");
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pullfocus"));
}
