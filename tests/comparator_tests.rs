use benchdelta::{
    BenchmarkResult, Classification, ComparisonPolicy, Provenance, ResultSet, compare,
    comparator::{Emphasis, compare_with},
};

fn set(provenance: Provenance, entries: &[(&str, f64)]) -> ResultSet {
    ResultSet::from_results(
        provenance,
        entries
            .iter()
            .map(|(id, mean)| BenchmarkResult::new(*id, *mean, 0.0)),
    )
}

#[test]
fn test_self_comparison_is_unchanged_with_zero_delta() {
    let results = set(
        Provenance::Current,
        &[("a", 0.1), ("b", 0.000_002), ("c", 3.5)],
    );
    let comparison = compare(&results, &results);
    assert_eq!(comparison.len(), 3);
    for entry in &comparison.entries {
        assert_eq!(entry.classification, Classification::Unchanged);
        assert_eq!(entry.delta_pct, Some(0.0));
    }
}

#[test]
fn test_six_percent_slower_is_regression() {
    let baseline = set(Provenance::Baseline, &[("insert", 0.100)]);
    let current = set(Provenance::Current, &[("insert", 0.106)]);
    let entry = compare(&baseline, &current).entries.remove(0);
    assert!((entry.delta_pct.unwrap() - 6.0).abs() < 1e-9);
    assert_eq!(entry.classification, Classification::Regression);
}

#[test]
fn test_noise_band_boundary() {
    let baseline = set(Provenance::Baseline, &[("at", 100.0), ("past", 100.0), ("below", 100.0)]);
    let current = set(Provenance::Current, &[("at", 105.0), ("past", 105.01), ("below", 95.0)]);
    let comparison = compare(&baseline, &current);
    assert_eq!(comparison.get("at").unwrap().delta_pct, Some(5.0));
    assert_eq!(comparison.get("at").unwrap().classification, Classification::Unchanged);
    assert_eq!(comparison.get("past").unwrap().classification, Classification::Regression);
    assert_eq!(comparison.get("below").unwrap().classification, Classification::Unchanged);
}

#[test]
fn test_improvement_below_negative_band() {
    let baseline = set(Provenance::Baseline, &[("scan", 0.010)]);
    let current = set(Provenance::Current, &[("scan", 0.009)]);
    let entry = compare(&baseline, &current).entries.remove(0);
    assert_eq!(entry.classification, Classification::Improvement);
    assert!(entry.is_improvement());
    assert!(!entry.is_regression());
}

#[test]
fn test_new_and_removed_regardless_of_value() {
    let baseline = set(Provenance::Baseline, &[("gone", 0.0)]);
    let current = set(Provenance::Current, &[("fresh", 0.0)]);
    let comparison = compare(&baseline, &current);
    let fresh = comparison.get("fresh").unwrap();
    assert_eq!(fresh.classification, Classification::New);
    assert_eq!(fresh.baseline, None);
    assert_eq!(fresh.delta_pct, None);
    assert_eq!(comparison.get("gone").unwrap().classification, Classification::Removed);
}

#[test]
fn test_zero_baseline_has_no_delta() {
    let baseline = set(Provenance::Baseline, &[("zero", 0.0), ("both_zero", 0.0)]);
    let current = set(Provenance::Current, &[("zero", 0.5), ("both_zero", 0.0)]);
    let comparison = compare(&baseline, &current);
    let zero = comparison.get("zero").unwrap();
    assert_eq!(zero.delta_pct, None);
    assert_eq!(zero.classification, Classification::New);
    let both_zero = comparison.get("both_zero").unwrap();
    assert_eq!(both_zero.delta_pct, None);
    assert_eq!(both_zero.classification, Classification::Unchanged);
    assert_eq!(comparison.count(Classification::New), 1);
    assert!(comparison.regressions().is_empty());
}

#[test]
fn test_entries_sorted_by_identifier() {
    let baseline = set(Provenance::Baseline, &[("m", 1.0), ("z", 1.0)]);
    let current = set(Provenance::Current, &[("a", 1.0), ("m", 1.0)]);
    let ids: Vec<String> = compare(&baseline, &current)
        .entries
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["a", "m", "z"]);
}

#[test]
fn test_summaries_sorted_by_magnitude() {
    let baseline = set(
        Provenance::Baseline,
        &[("r_small", 1.0), ("r_big", 1.0), ("i_small", 1.0), ("i_big", 1.0)],
    );
    let current = set(
        Provenance::Current,
        &[("r_small", 1.07), ("r_big", 1.5), ("i_small", 0.93), ("i_big", 0.5)],
    );
    let comparison = compare(&baseline, &current);
    let regressions: Vec<&str> = comparison.regressions().iter().map(|e| e.id.as_str()).collect();
    let improvements: Vec<&str> = comparison.improvements().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(regressions, vec!["r_big", "r_small"]);
    assert_eq!(improvements, vec!["i_big", "i_small"]);
}

#[test]
fn test_custom_policy_changes_classification() {
    let baseline = set(Provenance::Baseline, &[("x", 1.0)]);
    let current = set(Provenance::Current, &[("x", 1.03)]);
    let strict = ComparisonPolicy {
        noise_band_pct: 2.5,
        emphasis_band_pct: 1.0,
    };
    let entry = compare_with(&baseline, &current, &strict).entries.remove(0);
    assert_eq!(entry.classification, Classification::Regression);
    assert_eq!(compare(&baseline, &current).entries[0].classification, Classification::Unchanged);
}

#[test]
fn test_emphasis_is_display_only() {
    let policy = ComparisonPolicy::default();
    assert_eq!(policy.emphasis(3.0), Emphasis::SlightlySlower);
    assert_eq!(policy.emphasis(6.0), Emphasis::Slower);
    assert_eq!(policy.emphasis(-6.0), Emphasis::Faster);
    assert_eq!(policy.emphasis(-3.0), Emphasis::None);
    assert_eq!(policy.classify(Some(1.0), Some(1.03)), Classification::Unchanged);
}
