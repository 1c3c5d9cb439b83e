//! Integration tests for `launcher config`.
//!
//! Every test sets `LAUNCHER_CONFIG` to a temp path so the user's real
//! configuration is never read or written.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn launcher() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("launcher"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    launcher()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_config_show_without_file_prints_defaults() {
    let (_dir, path) = temp_config_path();
    launcher()
        .args(["config", "show"])
        .env("LAUNCHER_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("install.progress"))
        .stdout(predicate::str::contains("true"))
        .stdout(predicate::str::contains("1800"));
}

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    launcher()
        .args(["config", "set", "runtime.import_timeout_secs", "600"])
        .env("LAUNCHER_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set runtime.import_timeout_secs = 600"));

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("import_timeout_secs: 600"), "{content}");

    launcher()
        .args(["config", "show"])
        .env("LAUNCHER_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("600"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    launcher()
        .args(["config", "set", "install.colour", "red"])
        .env("LAUNCHER_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("install.progress"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_value_fails() {
    let (_dir, path) = temp_config_path();
    launcher()
        .args(["config", "set", "install.progress", "maybe"])
        .env("LAUNCHER_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("true, false"));
}

#[test]
fn test_config_show_json() {
    let (_dir, path) = temp_config_path();
    let output = launcher()
        .args(["config", "show", "--json"])
        .env("LAUNCHER_CONFIG", &path)
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["config"]["install"]["progress"], true);
    assert_eq!(value["path"], path.as_str());
}

#[test]
fn test_config_set_quiet_prints_nothing() {
    let (_dir, path) = temp_config_path();
    launcher()
        .args(["--quiet", "config", "set", "install.progress", "false"])
        .env("LAUNCHER_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
