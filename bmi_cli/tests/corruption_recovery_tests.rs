//! Corruption recovery tests for bmifit.
//!
//! These tests verify the system can handle:
//! - Corrupted profile files
//! - Corrupted history lines
//! - Partial writes
//! - Unreadable files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use tempfile::TempDir;

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bmifit"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_profile_falls_back_to_auto() {
    let temp_dir = setup_test_dir();
    let profiles = temp_dir.path().join("data/profiles");
    fs::create_dir_all(&profiles).unwrap();
    fs::write(profiles.join("default.json"), "{ invalid json }}}}").unwrap();

    cli(&temp_dir)
        .args(["plan", "--weight", "90", "--height", "180"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LOSE PLAN"));

    // Setting a goal replaces the corrupted file
    cli(&temp_dir).args(["goal", "gain"]).assert().success();
    let content = fs::read_to_string(profiles.join("default.json")).unwrap();
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(&content);
    assert!(parsed.is_ok(), "Profile should be valid JSON");
}

#[test]
fn test_corrupted_history_lines_ignored() {
    let temp_dir = setup_test_dir();
    let history = temp_dir.path().join("data/history");
    fs::create_dir_all(&history).unwrap();
    fs::write(history.join("default.jsonl"), "{ invalid json }\n{ more invalid }\n")
        .expect("Failed to write corrupted history");

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No measurements recorded."));

    cli(&temp_dir)
        .args(["log", "--weight", "70", "--height", "175"])
        .assert()
        .success();

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("70.0 kg"));
}

#[test]
fn test_partial_history_line() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["log", "--weight", "90", "--height", "180"])
        .assert()
        .success();

    // Simulate a crash mid-write
    let history_path = temp_dir.path().join("data/history/default.jsonl");
    let mut file = fs::OpenOptions::new().append(true).open(&history_path).unwrap();
    write!(file, r#"{{"id":"partial"#).unwrap();
    drop(file);

    cli(&temp_dir)
        .args(["plan", "--goal", "lose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated time: 25 weeks"));
}

#[test]
fn test_empty_history_file() {
    let temp_dir = setup_test_dir();
    let history = temp_dir.path().join("data/history");
    fs::create_dir_all(&history).unwrap();
    fs::write(history.join("default.jsonl"), "").unwrap();

    cli(&temp_dir)
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no measurements recorded"));

    cli(&temp_dir)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 0 measurements"));
}

#[test]
fn test_invalid_config_reported() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/bmifit");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[limits\nbroken").unwrap();

    cli(&temp_dir)
        .args(["bmi", "--weight", "70", "--height", "175"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Toml"));
}

#[test]
fn test_permission_denied_profile() {
    // Skip on Windows (permission model is different)
    if cfg!(windows) {
        return;
    }

    let temp_dir = setup_test_dir();
    let profiles = temp_dir.path().join("data/profiles");
    fs::create_dir_all(&profiles).unwrap();
    let profile_path = profiles.join("default.json");
    fs::write(&profile_path, r#"{"goal":{"kind":"explicit","goal":"fit"}}"#).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&profile_path).unwrap().permissions();
        perms.set_mode(0o000);
        fs::set_permissions(&profile_path, perms).unwrap();

        // Unreadable profile is treated as unset
        cli(&temp_dir)
            .args(["plan", "--weight", "90", "--height", "180", "--json"])
            .assert()
            .success();

        let mut perms = fs::metadata(&profile_path).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&profile_path, perms).unwrap();
    }
}
