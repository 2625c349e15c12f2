use benchdelta::recommend::{MetricSample, Recommender, WITHIN_BOUNDS};

fn sample(name: &str, current: f64, baseline: Option<f64>) -> MetricSample {
    MetricSample {
        name: name.into(),
        current,
        baseline,
    }
}

#[test]
fn test_fallback_when_nothing_fires() {
    let out = Recommender::default().evaluate(&[sample("sequential_writes", 100e-6, Some(100e-6))]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].subject, None);
    assert_eq!(out[0].advice, WITHIN_BOUNDS);
    assert_eq!(out[0].to_markdown(), format!("- {WITHIN_BOUNDS}"));
}

#[test]
fn test_regressions_precede_guidance_rules() {
    let out = Recommender::default().evaluate(&[
        sample("random_reads", 150e-6, Some(120e-6)),
        sample("btree_search", 80e-9, Some(90e-9)),
    ]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].subject.as_deref(), Some("random_reads"));
    assert!(out[0].advice.contains("25.0% regression detected"));
    assert_eq!(out[1].subject.as_deref(), Some("Random reads"));
}

#[test]
fn test_guidance_matches_substring_and_uses_worst_value() {
    let out = Recommender::default().evaluate(&[
        sample("zerodb/page_allocation/single", 100e-9, None),
        sample("zerodb/page_allocation/batch", 900e-9, None),
    ]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].subject.as_deref(), Some("Page allocation"));
    assert!(out[0].to_markdown().starts_with("- **Page allocation:** "));
}

#[test]
fn test_regression_rule_threshold_is_exclusive() {
    let recommender = Recommender::default();
    let out = recommender.evaluate(&[sample("x", 110.0, Some(100.0))]);
    assert_eq!(out[0].advice, WITHIN_BOUNDS);
}
