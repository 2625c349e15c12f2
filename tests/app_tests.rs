use std::{fs, path::Path};

use benchdelta::{
    ReportConfig, ReportMode, ResultSource,
    app::{CompareRequest, DashboardRequest, ReportRequest, run_compare, run_dashboard, run_report},
};
use serde_json::json;
use tempfile::TempDir;

fn write_stream(path: &Path, records: &[(&str, f64)]) {
    let lines: Vec<String> = records
        .iter()
        .map(|(id, median)| {
            json!({
                "reason": "benchmark-complete",
                "id": id,
                "median": { "point_estimate": median }
            })
            .to_string()
        })
        .collect();
    fs::write(path, lines.join("\n")).unwrap();
}

fn write_estimates(root: &Path, id: &str, mean_ns: f64) {
    let base = root.join(id).join("base");
    fs::create_dir_all(&base).unwrap();
    let estimates = json!({
        "mean": { "point_estimate": mean_ns },
        "std_dev": { "point_estimate": mean_ns / 100.0 }
    });
    fs::write(base.join("estimates.json"), estimates.to_string()).unwrap();
}

#[test]
fn test_compare_writes_report_before_gate_verdict() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.json");
    let pr = dir.path().join("pr.json");
    write_stream(&base, &[("insert", 100_000.0), ("scan", 100_000.0)]);
    write_stream(&pr, &[("insert", 125_000.0), ("scan", 100_000.0)]);
    let request = CompareRequest {
        baseline: ResultSource::EventStream(base),
        current: ResultSource::EventStream(pr),
        output: dir.path().join("out").join("benchmark-report.md"),
    };
    let outcome = run_compare(&request, &ReportConfig::default()).unwrap();
    assert!(!outcome.first_run);
    assert!(!outcome.gate.passed);
    assert!(outcome.gate.reasons[0].contains("insert"));
    let written = fs::read_to_string(&outcome.report_path).unwrap();
    assert_eq!(written, outcome.markdown);
    assert!(written.contains("- `insert`: 25.0% slower"));
}

#[test]
fn test_compare_first_run_passes_gate() {
    let dir = TempDir::new().unwrap();
    let pr = dir.path().join("pr.json");
    write_stream(&pr, &[("insert", 1_000.0)]);
    let request = CompareRequest {
        baseline: ResultSource::EventStream(dir.path().join("missing.json")),
        current: ResultSource::EventStream(pr),
        output: dir.path().join("benchmark-report.md"),
    };
    let outcome = run_compare(&request, &ReportConfig::default()).unwrap();
    assert!(outcome.first_run);
    assert!(outcome.gate.passed);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.markdown.contains("(First Run)"));
}

#[test]
fn test_report_reads_both_suites() {
    let dir = TempDir::new().unwrap();
    let criterion = dir.path().join("criterion");
    write_estimates(&criterion.join("database_comparison"), "lmdb/random_reads", 2_000_000.0);
    write_estimates(&criterion.join("database_comparison"), "zerodb/random_reads", 1_000_000.0);
    write_estimates(
        &criterion.join("zerodb_performance"),
        "btree_operations_sequential_insert",
        5_000_000.0,
    );
    let request = ReportRequest {
        criterion_dir: criterion,
        mode: ReportMode::Both,
        generated: "t".into(),
        revision: None,
    };
    let outcome = run_report(&request, &ReportConfig::default()).unwrap();
    assert!(outcome.text.contains("ZeroDB is 2.00x faster than LMDB"));
    assert!(outcome.text.contains("## Btree Operations"));
    assert!(!outcome.gate.passed);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_report_engines_only_skips_detail_gate() {
    let dir = TempDir::new().unwrap();
    let request = ReportRequest {
        criterion_dir: dir.path().to_path_buf(),
        mode: ReportMode::CompareEngines,
        generated: "t".into(),
        revision: None,
    };
    let outcome = run_report(&request, &ReportConfig::default()).unwrap();
    assert!(outcome.gate.passed);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.text.contains("No benchmark results found"));
}

#[test]
fn test_dashboard_illustrative_and_live() {
    let dir = TempDir::new().unwrap();
    let illustrative = run_dashboard(
        &DashboardRequest {
            runs: None,
            out_dir: dir.path().join("site"),
            generated: "t".into(),
        },
        &ReportConfig::default(),
    )
    .unwrap();
    assert_eq!(illustrative.data.metrics.len(), 5);
    assert!(illustrative.page_path.exists());

    let base = dir.path().join("base.json");
    let pr = dir.path().join("pr.json");
    write_stream(&base, &[("insert", 1_000.0)]);
    write_stream(&pr, &[("insert", 900.0)]);
    let live = run_dashboard(
        &DashboardRequest {
            runs: Some((ResultSource::EventStream(base), ResultSource::EventStream(pr))),
            out_dir: dir.path().join("live"),
            generated: "t".into(),
        },
        &ReportConfig::default(),
    )
    .unwrap();
    assert_eq!(live.data.metrics.len(), 1);
    assert_eq!(live.data.metrics[0].unit, "µs");
}
