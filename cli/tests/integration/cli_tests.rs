//! Integration tests for the cjob CLI surface.
//!
//! Every test points `CJOB_CONFIG` at a temp file (or a missing path) so no
//! test reads a real config or reaches AWS.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALID_CONFIG: &str = "\
AWS_REGION: eu-west-1
AWS_PROFILE: batch
EC2_INSTANCE_TYPE: t3.small
EC2_KEY_FILE_PATH: /tmp/cjob-test-key.pem
";

fn cjob() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cjob"));
    cmd.env("NO_COLOR", "1")
        .env_remove("AWS_ACCESS_KEY_ID")
        .env_remove("AWS_SECRET_ACCESS_KEY")
        .env_remove("CI")
        .env_remove("CJOB_YES");
    cmd
}

/// A `cjob` command reading `content` as its config file.
fn with_config(content: &str) -> (TempDir, Command) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cjob.yml");
    std::fs::write(&path, content).expect("write config");
    let mut cmd = cjob();
    cmd.env("CJOB_CONFIG", &path);
    (dir, cmd)
}

// --- Help and parsing ---

#[test]
fn test_cli_no_args_shows_help_and_exits_2() {
    cjob().assert().code(2).stderr(predicate::str::contains(
        "Run ad-hoc batch jobs on tagged EC2 instances",
    ));
}

#[test]
fn test_help_lists_every_command() {
    let assert = cjob().arg("--help").assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for command in [
        "ssh", "start", "stop", "run", "status", "settings", "ami", "cleanup", "upload",
        "download", "ls",
    ] {
        assert!(out.contains(command), "missing {command} in help:\n{out}");
    }
}

#[test]
fn test_version_flag_shows_version() {
    cjob()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cjob"));
}

#[test]
fn test_unknown_command_exits_with_error() {
    cjob()
        .arg("launch-rockets")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_run_requires_a_command() {
    cjob().args(["run", "train"]).assert().code(2);
}

#[test]
fn test_cleanup_requires_a_target() {
    cjob().arg("cleanup").assert().code(2);
}

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "yes", "true"] {
        let (_dir, mut cmd) = with_config(VALID_CONFIG);
        cmd.env("NO_COLOR", value)
            .arg("settings")
            .assert()
            .success()
            .stdout(predicate::str::contains("eu-west-1"));
    }
}

#[test]
fn test_no_color_flag_is_accepted() {
    let (_dir, mut cmd) = with_config(VALID_CONFIG);
    cmd.args(["settings", "--no-color"]).assert().success();
}

// --- Settings loading ---

#[test]
fn test_missing_config_fails_with_hint() {
    let dir = TempDir::new().expect("temp dir");
    cjob()
        .arg("status")
        .env("CJOB_CONFIG", dir.path().join("absent.yml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not find a config file"));
}

#[test]
fn test_conflicting_credentials_are_rejected() {
    let (_dir, mut cmd) = with_config(&format!(
        "{VALID_CONFIG}AWS_ACCESS_KEY_ID: AKIAEXAMPLE\nAWS_SECRET_ACCESS_KEY: secret\n"
    ));
    cmd.arg("settings")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Choose one credential mode"));
}

#[test]
fn test_spot_without_price_is_rejected() {
    let (_dir, mut cmd) = with_config(&format!("{VALID_CONFIG}EC2_USE_SPOT: true\n"));
    cmd.arg("settings")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("EC2_SPOT_MAX_PRICE"));
}

#[test]
fn test_settings_shows_loaded_values() {
    let (_dir, mut cmd) = with_config(VALID_CONFIG);
    cmd.arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("eu-west-1"))
        .stdout(predicate::str::contains("t3.small"));
}

#[test]
fn test_settings_json_redacts_secret() {
    let (_dir, mut cmd) = with_config(
        "\
AWS_REGION: eu-west-1
AWS_ACCESS_KEY_ID: AKIAEXAMPLE
AWS_SECRET_ACCESS_KEY: very-secret-value
EC2_INSTANCE_TYPE: t3.small
EC2_KEY_FILE_PATH: /tmp/cjob-test-key.pem
",
    );
    let assert = cmd.args(["settings", "--json"]).assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let json: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");

    assert_eq!(json["region"], "eu-west-1");
    assert!(!out.contains("very-secret-value"));
}

// --- Naming policy at the CLI boundary ---

#[test]
fn test_start_all_is_reserved() {
    let (_dir, mut cmd) = with_config(VALID_CONFIG);
    cmd.args(["start", "all"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reserved"));
}

#[test]
fn test_ssh_all_is_reserved() {
    let (_dir, mut cmd) = with_config(VALID_CONFIG);
    cmd.args(["ssh", "all"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reserved"));
}

#[test]
fn test_stop_all_with_keep_is_rejected() {
    let (_dir, mut cmd) = with_config(VALID_CONFIG);
    cmd.args(["stop", "all", "--keep"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--keep needs a single job name"));
}

#[test]
fn test_spot_with_stop_behaviour_is_rejected() {
    let (_dir, mut cmd) = with_config(&format!(
        "{VALID_CONFIG}EC2_USE_SPOT: true\nEC2_SPOT_MAX_PRICE: 0.2\nEC2_SHUTDOWN_BEHAVIOUR: stop\n"
    ));
    cmd.arg("settings")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("One-time spot instances"));
}

#[test]
fn test_json_error_is_machine_readable() {
    let (_dir, mut cmd) = with_config(VALID_CONFIG);
    let assert = cmd.args(["start", "all", "--json"]).assert().code(1);
    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let json: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");

    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "name");
}

// --- Object storage ---

#[test]
fn test_upload_without_bucket_fails_before_any_call() {
    let (_dir, mut cmd) = with_config(VALID_CONFIG);
    cmd.args(["upload", "/tmp", "runs/"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("S3_BUCKET_NAME"));
}
