//! Seeded synthetic result sets for benches and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::model::{BenchmarkResult, Provenance, ResultSet};

const ENGINES: &[&str] = &["lmdb", "zerodb", "redb", "rocksdb"];
const OPERATIONS: &[&str] = &[
    "sequential_writes",
    "random_writes",
    "random_reads",
    "concurrent_reads",
    "full_scan",
    "mixed_workload",
];

#[derive(Clone, Debug)]
pub struct SyntheticRun {
    pub baseline: ResultSet,
    pub current: ResultSet,
}

/// Deterministic `engine/operation/variant` baseline and current sets.
///
/// Each current mean is the baseline mean scaled by a factor drawn from
/// `1.0 +/- max_drift`. A `churn` fraction of identifiers exists in only one
/// of the two sets.
///
/// `max_drift` is clamped to `[0, 1]` and `churn` to `[0, 1]`; non-finite
/// values count as zero.
pub fn generate_run(benchmarks: usize, max_drift: f64, churn: f64, seed: u64) -> SyntheticRun {
    let max_drift = clamp_unit(max_drift);
    let churn = clamp_unit(churn);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut baseline = Vec::with_capacity(benchmarks);
    let mut current = Vec::with_capacity(benchmarks);
    for idx in 0..benchmarks {
        let id = synthetic_id(idx);
        let mean = rng.gen_range(1e-7..1e-2);
        let std_dev = mean * rng.gen_range(0.0..0.05);
        let drift = 1.0 + rng.gen_range(-max_drift..=max_drift);
        let roll = rng.r#gen::<f64>();
        if roll < churn / 2.0 {
            baseline.push(BenchmarkResult::new(id, mean, std_dev));
        } else if roll < churn {
            current.push(BenchmarkResult::new(id, mean * drift, std_dev));
        } else {
            baseline.push(BenchmarkResult::new(id.clone(), mean, std_dev));
            current.push(BenchmarkResult::new(id, mean * drift, std_dev));
        }
    }
    SyntheticRun {
        baseline: ResultSet::from_results(Provenance::Baseline, baseline),
        current: ResultSet::from_results(Provenance::Current, current),
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn synthetic_id(idx: usize) -> String {
    let engine = ENGINES[idx % ENGINES.len()];
    let operation = OPERATIONS[(idx / ENGINES.len()) % OPERATIONS.len()];
    let variant = idx / (ENGINES.len() * OPERATIONS.len());
    format!("{engine}/{operation}/{variant}")
}
