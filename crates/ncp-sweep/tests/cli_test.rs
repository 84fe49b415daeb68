#![allow(deprecated)] // TODO: move from Command::cargo_bin to the cargo_bin_cmd! macro

use assert_cmd::Command;
use predicates::prelude::*;

fn ncp_sweep() -> Command {
    let mut cmd = Command::cargo_bin("ncp-sweep").unwrap();
    cmd.env_remove("NCP_SWEEP_FILE")
        .env_remove("NCP_SWEEP_FILTER_PATH");
    cmd
}

#[test]
fn test_cli_help() {
    ncp_sweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("NAVER Cloud Platform"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("activate"))
        .stdout(predicate::str::contains("deactivate"))
        .stdout(predicate::str::contains("template"))
        .stdout(predicate::str::contains("tui"));
}

#[test]
fn test_cli_version() {
    ncp_sweep()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ncp-sweep"));
}

#[test]
fn test_deactivate_help() {
    ncp_sweep()
        .args(["deactivate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--cleanup"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--file"));
}

#[test]
fn test_activate_help() {
    ncp_sweep()
        .args(["activate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("--yes"));
}

#[test]
fn test_invalid_command() {
    ncp_sweep().arg("invalid-command").assert().failure();
}

#[test]
fn test_list_without_file() {
    ncp_sweep()
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--file <FILE>"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_needs_no_file() {
    ncp_sweep().arg("version").assert().success();
}

#[test]
fn test_list_with_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    ncp_sweep()
        .arg("-f")
        .arg(temp_dir.path().join("missing.xlsx"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read spreadsheet"));
}

#[test]
fn test_template_writes_file() {
    let temp_dir = tempfile::tempdir().unwrap();

    ncp_sweep()
        .current_dir(temp_dir.path())
        .arg("template")
        .assert()
        .success()
        .stdout(predicate::str::contains("Template written"));

    assert!(temp_dir.path().join("accounts_template.xlsx").exists());
}

#[test]
fn test_template_refuses_to_overwrite() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("accounts.xlsx");
    std::fs::write(&output, b"existing").unwrap();

    ncp_sweep()
        .arg("template")
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(std::fs::read(&output).unwrap(), b"existing");
}

#[test]
fn test_unknown_account_is_rejected_before_any_call() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file = temp_dir.path().join("accounts.xlsx");
    ncp_sweep()
        .args(["template", "--output"])
        .arg(&file)
        .assert()
        .success();

    ncp_sweep()
        .arg("--file")
        .arg(&file)
        .args(["--account", "nobody", "deactivate", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account 'nobody' not found"));
}

#[test]
fn test_file_from_environment() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file = temp_dir.path().join("accounts.xlsx");
    ncp_sweep()
        .args(["template", "--output"])
        .arg(&file)
        .assert()
        .success();

    ncp_sweep()
        .env("NCP_SWEEP_FILE", &file)
        .args(["-a", "nobody", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nobody"));
}

#[test]
fn test_malformed_filter_file_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file = temp_dir.path().join("accounts.xlsx");
    let filter = temp_dir.path().join("filter.json");
    std::fs::write(&filter, r#"{"server": {"enabled": false}}"#).unwrap();
    ncp_sweep()
        .args(["template", "--output"])
        .arg(&file)
        .assert()
        .success();

    ncp_sweep()
        .arg("-f")
        .arg(&file)
        .args(["deactivate", "--cleanup", "--dry-run", "--config"])
        .arg(&filter)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid filter file"));
}
