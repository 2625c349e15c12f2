use std::time::Duration;

use benchdelta::{
    ComparisonPolicy, ReportConfig, compare,
    dashboard::DashboardData,
    report::{NarrativeContext, render_detail_report, render_diff_report, render_engine_comparison},
    synthetic::{SyntheticRun, generate_run},
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const RUN_SEED: u64 = 0xD17A;
const MAX_DRIFT: f64 = 0.12;
const CHURN: f64 = 0.05;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

fn bench_scales() -> &'static [usize] {
    #[cfg(feature = "bench-ci")]
    {
        &[100, 1_000]
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        &[1_000, 10_000, 50_000]
    }
}

fn runs() -> Vec<(usize, SyntheticRun)> {
    bench_scales()
        .iter()
        .map(|&n| (n, generate_run(n, MAX_DRIFT, CHURN, RUN_SEED + n as u64)))
        .collect()
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for (n, run) in runs() {
        group.bench_with_input(BenchmarkId::from_parameter(n), &run, |b, run| {
            b.iter(|| compare(&run.baseline, &run.current));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let config = ReportConfig::default();
    let policy = ComparisonPolicy::default();
    let recommender = config.recommender();
    let ctx = NarrativeContext {
        config: &config,
        generated: "bench",
        revision: None,
    };
    let mut group = c.benchmark_group("render");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for (n, run) in runs() {
        let comparison = compare(&run.baseline, &run.current);
        group.bench_with_input(BenchmarkId::new("diff", n), &comparison, |b, cmp| {
            b.iter(|| render_diff_report(cmp, &policy));
        });
        group.bench_with_input(BenchmarkId::new("engines", n), &run, |b, run| {
            b.iter(|| render_engine_comparison(&run.current, &ctx));
        });
        group.bench_with_input(BenchmarkId::new("detail", n), &run, |b, run| {
            b.iter(|| render_detail_report(&run.current, &ctx));
        });
        group.bench_with_input(BenchmarkId::new("dashboard", n), &comparison, |b, cmp| {
            b.iter(|| DashboardData::from_comparison(cmp, &policy, &recommender, "bench"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compare, bench_render);
criterion_main!(benches);
