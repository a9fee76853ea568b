mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn bin() -> Command { Command::cargo_bin("checkpoint").unwrap() }

#[test]
fn usage_error_bad_flag() {
    let assert = bin().arg("--nonexistent").assert().failure();
    assert_eq!(assert.get_output().status.code(), Some(2));
}

#[test]
fn config_error_invalid_toml() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_dir = tmp.path().join("checkpoint");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    std::fs::write(cfg_dir.join("config.toml"), "***").unwrap();
    let assert = bin().env("XDG_CONFIG_HOME", tmp.path()).args(["requests", "list"]).assert().failure();
    let code = assert.get_output().status.code().unwrap();
    assert_eq!(code, 10, "expected config code 10 got {code}");
}

#[test]
fn unauthorized_points_at_sign_in() {
    let base = common::spawn(common::rejecting_registry());
    let tmp = tempfile::tempdir().unwrap();
    let assert = bin().env("XDG_CONFIG_HOME", tmp.path()).env("CHECKPOINT_API_BASE", &base).arg("whoami").assert().failure()
        .stderr(contains("/oauth2/sign_in"));
    assert_eq!(assert.get_output().status.code(), Some(50));
}

#[test]
fn form_without_registry_is_a_network_error() {
    let tmp = tempfile::tempdir().unwrap();
    let assert = bin().env("XDG_CONFIG_HOME", tmp.path()).env("CHECKPOINT_API_BASE", "http://127.0.0.1:1")
        .args(["requests", "new", "--title", "t", "--model", "m", "--version", "1", "--target", "staging"])
        .assert().failure();
    assert_eq!(assert.get_output().status.code(), Some(40));
}

#[test]
fn unknown_route_is_usage_error() {
    let tmp = tempfile::tempdir().unwrap();
    let assert = bin().env("XDG_CONFIG_HOME", tmp.path()).args(["open", "/nowhere"]).assert().failure().stderr(contains("unknown route"));
    assert_eq!(assert.get_output().status.code(), Some(2));
}
