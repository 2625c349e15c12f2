use std::fs;

use assert_cmd::Command;
use serde_json::json;
use tempfile::TempDir;

fn record(id: &str, median: f64) -> String {
    json!({ "reason": "benchmark-complete", "id": id, "median": { "point_estimate": median } })
        .to_string()
}

#[test]
fn test_cli_exits_with_success_on_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdelta"));
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn test_cli_compare_six_percent_does_not_fail() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("base.json"), record("insert", 100_000.0)).unwrap();
    fs::write(dir.path().join("pr.json"), record("insert", 106_000.0)).unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdelta"));
    cmd.current_dir(dir.path())
        .args(["compare", "--baseline", "base.json", "--current", "pr.json"]);
    cmd.assert().success();
    let report = fs::read_to_string(dir.path().join("benchmark-report.md")).unwrap();
    assert!(report.contains("6.0% slower"));
}

#[test]
fn test_cli_compare_hard_fail_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("base.json"), record("insert", 100_000.0)).unwrap();
    fs::write(dir.path().join("pr.json"), record("insert", 120_000.0)).unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdelta"));
    cmd.current_dir(dir.path())
        .args(["compare", "--baseline", "base.json", "--current", "pr.json"]);
    cmd.assert().code(1);
    assert!(dir.path().join("benchmark-report.md").exists());
}

#[test]
fn test_cli_report_rejects_both_mode_flags() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdelta"));
    cmd.args(["report", "--compare-engines", "--single-engine"]);
    cmd.assert().failure();
}

#[test]
fn test_cli_dashboard_writes_page() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdelta"));
    cmd.args(["dashboard", "--out-dir"]).arg(dir.path().join("target"));
    cmd.assert().success();
    assert!(dir.path().join("target/performance-dashboard.html").exists());
}

#[test]
fn test_cli_bad_config_exits_with_usage_code() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdelta"));
    cmd.args(["--config"])
        .arg(dir.path().join("absent.json"))
        .arg("dashboard")
        .arg("--out-dir")
        .arg(dir.path());
    cmd.assert().code(2);
}
