mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn bin() -> Command { Command::cargo_bin("checkpoint").unwrap() }

fn against(base: &str) -> Command {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = bin();
    cmd.env("XDG_CONFIG_HOME", tmp.path()).env("CHECKPOINT_API_BASE", base).env_remove("CHECKPOINT_FORMAT");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("stdout should be JSON")
}

#[test]
fn help_works() { bin().arg("--help").assert().success().stdout(contains("requests")); }

#[test]
fn version_works() { bin().arg("--version").assert().success(); }

#[test]
fn completions_bash() { bin().args(["completions", "--shell", "bash"]).assert().success().stdout(contains("checkpoint")); }

#[test]
fn list_renders_table() {
    let base = common::spawn(common::registry());
    against(&base).args(["requests", "list"]).assert().success()
        .stdout(contains("Target Stage"))
        .stdout(contains("Promote fraud v7"))
        .stdout(contains("Models: churn, fraud"));
}

#[test]
fn list_filters_by_status_bucket_and_model() {
    let base = common::spawn(common::registry());
    let closed = stdout_json(against(&base).args(["requests", "list", "--status", "closed", "--format", "json"]));
    let ids: Vec<i64> = closed.as_array().unwrap().iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [2, 3]);
    let churn_open = stdout_json(against(&base).args(["requests", "list", "--model", "churn", "--status", "open", "--format", "json"]));
    assert_eq!(churn_open.as_array().unwrap().len(), 1);
    assert_eq!(churn_open[0]["id"], 1);
}

#[test]
fn show_renders_diff() {
    let base = common::spawn(common::registry());
    against(&base).args(["requests", "show", "1"]).assert().success()
        .stdout(contains("#1: Promote churn v2"))
        .stdout(contains("Version 1 [production ✓]"))
        .stdout(contains("-0.0300"))
        .stdout(contains("Retrained on Q3 data"))
        .stdout(contains("[Open] awaiting review"));
}

#[test]
fn show_json_marks_changed_rows() {
    let base = common::spawn(common::registry());
    let view = stdout_json(against(&base).args(["requests", "show", "1", "--format", "json"]));
    assert_eq!(view["changed_metrics"], serde_json::json!(["auc", "f1", "rmse"]));
    assert_eq!(view["changed_parameters"], serde_json::json!(["depth"]));
    assert_eq!(view["metrics"][0], serde_json::json!({"name": "auc", "challenger_value": "0.9100", "champion_value": "0.8800", "change": "-0.0300"}));
}

#[test]
fn show_reviewed_request() {
    let base = common::spawn(common::registry());
    against(&base).args(["requests", "show", "3"]).assert().success()
        .stdout(contains("[Closed] By rui on "))
        .stdout(contains("No comment provided."));
}

#[test]
fn lists() {
    let base = common::spawn(common::registry());
    against(&base).arg("models").assert().success().stdout(contains("churn\nfraud\n"));
    against(&base).args(["versions", "churn"]).assert().success().stdout(contains("1\n2\n"));
    against(&base).args(["stages", "--format", "json"]).assert().success().stdout(contains("\"production\""));
}

#[test]
fn whoami() {
    let base = common::spawn(common::registry());
    against(&base).arg("whoami").assert().success().stdout(contains("ana <ana@example.com>"));
}

#[test]
fn open_routes() {
    let base = common::spawn(common::registry());
    against(&base).args(["open", "/checkpoint/requests/2"]).assert().success().stdout(contains("[Approved] By rui"));
    against(&base).args(["open", "/checkpoint/requests/new?model=churn&target=production"]).assert().success()
        .stdout(contains("New Promote Request"))
        .stdout(contains("--model churn --version <...> --target production"));
}

#[test]
fn unreachable_registry_leaves_views_empty() {
    against("http://127.0.0.1:1").args(["requests", "list"]).assert().success().stdout(contains("No promote requests."));
}
