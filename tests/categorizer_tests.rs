use benchdelta::{BenchmarkResult, Categorizer, EnginePivot, Provenance, ResultSet};

fn set(entries: &[(&str, f64)]) -> ResultSet {
    ResultSet::from_results(
        Provenance::Single,
        entries
            .iter()
            .map(|(id, mean)| BenchmarkResult::new(*id, *mean, 0.0)),
    )
}

#[test]
fn test_categories_follow_configured_order_and_sort_members() {
    let categorizer = Categorizer::new(["page_allocation", "btree_operations"]);
    let results = set(&[
        ("btree_operations_split", 1.0),
        ("btree_operations_insert", 1.0),
        ("page_allocation_single", 1.0),
        ("unrelated_bench", 1.0),
    ]);
    let categories = categorizer.categorize(&results);
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "page_allocation");
    assert_eq!(categories[1].title(), "Btree Operations");
    let members: Vec<&str> = categories[1].results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(members, vec!["btree_operations_insert", "btree_operations_split"]);
}

#[test]
fn test_uncategorized_ids_stay_in_flat_set() {
    let categorizer = Categorizer::new(["btree_operations"]);
    let results = set(&[("unrelated_bench", 1.0)]);
    assert!(categorizer.categorize(&results).is_empty());
    assert!(results.contains("unrelated_bench"));
    assert_eq!(categorizer.category_of("unrelated_bench"), None);
}

#[test]
fn test_pivot_drops_single_segment_ids() {
    let results = set(&[
        ("lmdb/random_reads", 0.002),
        ("zerodb/random_reads", 0.001),
        ("zerodb/full_scan", 0.01),
        ("standalone", 1.0),
    ]);
    let pivot = EnginePivot::from_results(&results);
    assert_eq!(pivot.engines().collect::<Vec<_>>(), vec!["lmdb", "zerodb"]);
    assert_eq!(
        pivot.operations().collect::<Vec<_>>(),
        vec!["full_scan", "random_reads"]
    );
    assert!(pivot.get("full_scan", "lmdb").is_none());
    assert_eq!(pivot.get("random_reads", "zerodb").unwrap().mean, 0.001);
}

#[test]
fn test_relative_throughput_only_where_both_engines_present() {
    let results = set(&[
        ("lmdb/random_reads", 0.002),
        ("zerodb/random_reads", 0.001),
        ("zerodb/full_scan", 0.01),
    ]);
    let ratios = EnginePivot::from_results(&results).relative_throughput("lmdb", "zerodb");
    assert_eq!(ratios.len(), 1);
    assert_eq!(ratios[0].0, "random_reads");
    assert!((ratios[0].1 - 2.0).abs() < 1e-9);
}

#[test]
fn test_relative_throughput_skips_zero_reference() {
    let results = set(&[("lmdb/noop", 0.0), ("zerodb/noop", 0.001)]);
    let ratios = EnginePivot::from_results(&results).relative_throughput("lmdb", "zerodb");
    assert!(ratios.is_empty());
}
