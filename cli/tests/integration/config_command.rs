//! Integration tests for `appctl config`.
//!
//! All filesystem-touching tests set `APPCTL_CONFIG` to a temp path so they
//! never read or write `~/.appctl/config.yaml`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn appctl() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("appctl"));
    cmd.env("NO_COLOR", "1")
        .env_remove("APPCTL_DATA_ROOT")
        .env_remove("APPCTL_CATALOG_ROOT")
        .env_remove("APPCTL_SCRIPT_TIMEOUT_SECS");
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
fn test_config_help_shows_subcommands() {
    appctl()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_config_path_honours_env_override() {
    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "path"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_show_without_file_marks_defaults() {
    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "show"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("script_timeout_secs"))
        .stdout(predicate::str::contains("900"))
        .stdout(predicate::str::contains("(not in config file)"));
    assert!(!std::path::Path::new(&path).exists(), "show must not create the file");
}

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "set", "script_timeout_secs", "120"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("script_timeout_secs: 120"), "got: {content}");

    let assert = appctl()
        .args(["config", "show", "--json"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(value["stored"]["script_timeout_secs"], 120);
    assert_eq!(value["effective"]["script_timeout_secs"], 120);
}

#[cfg(unix)]
#[test]
fn test_config_set_writes_owner_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "set", "catalog_root", "/srv/catalog"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .success();
    let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "set", "security.level", "strict"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("security.level"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_rejects_zero_timeout() {
    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "set", "script_timeout_secs", "0"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .failure();
}

#[test]
fn test_flag_overrides_config_file() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "script_timeout_secs: 60\n").expect("write config");
    let assert = appctl()
        .args(["config", "show", "--json", "--script-timeout", "7"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(value["stored"]["script_timeout_secs"], 60);
    assert_eq!(value["effective"]["script_timeout_secs"], 7);
}

#[test]
fn test_env_var_overrides_config_file() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "data_root: /from/file\n").expect("write config");
    appctl()
        .args(["config", "show"])
        .env("APPCTL_CONFIG", &path)
        .env("APPCTL_DATA_ROOT", "/from/env")
        .assert()
        .success()
        .stdout(predicate::str::contains("/from/env"));
}

#[test]
fn test_zero_script_timeout_flag_is_a_usage_error() {
    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "show", "--script-timeout", "0"])
        .env("APPCTL_CONFIG", &path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--script-timeout"));
}

#[test]
fn test_zero_script_timeout_from_env_is_rejected() {
    let (_dir, path) = temp_config_path();
    appctl()
        .args(["config", "show"])
        .env("APPCTL_CONFIG", &path)
        .env("APPCTL_SCRIPT_TIMEOUT_SECS", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("script_timeout_secs"));
}
