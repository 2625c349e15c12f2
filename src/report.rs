//! Markdown renderings: the baseline/current diff report and the two
//! narrative reports. Every function here is pure; timestamps and revisions
//! are passed in by the caller.

use crate::{
    categorizer::EnginePivot,
    comparator::{Classification, Comparison, ComparisonPolicy},
    config::{ReportConfig, ReportMode},
    format::{format_change, format_mean_throughput, format_millis, format_time},
    gate::{GateOutcome, GateViolation},
    model::ResultSet,
    recommend::{MetricSample, Recommendation},
};

pub const NO_SIGNIFICANT_CHANGE: &str = "No significant performance changes detected";

/// Table of every compared identifier followed by regression and
/// improvement summaries, each ordered by magnitude.
pub fn render_diff_report(comparison: &Comparison, policy: &ComparisonPolicy) -> String {
    let mut out = vec![
        "## Benchmark Results".to_string(),
        String::new(),
        "| Benchmark | Base | PR | Change |".to_string(),
        "|-----------|------|----|-------:|".to_string(),
    ];
    for entry in &comparison.entries {
        let row = match (entry.baseline, entry.current, entry.classification) {
            (Some(base), Some(cur), Classification::New) => format!(
                "| `{}` | {} | {} | New |",
                entry.id,
                format_time(base),
                format_time(cur)
            ),
            (Some(base), Some(cur), _) => format!(
                "| `{}` | {} | {} | {} |",
                entry.id,
                format_time(base),
                format_time(cur),
                format_change(entry.delta_pct, policy)
            ),
            (None, Some(cur), _) => format!("| `{}` | - | {} | New |", entry.id, format_time(cur)),
            (Some(base), None, _) => {
                format!("| `{}` | {} | - | Removed |", entry.id, format_time(base))
            }
            (None, None, classification) => {
                format!("| `{}` | - | - | {} |", entry.id, classification.label())
            }
        };
        out.push(row);
    }

    out.push(String::new());
    out.push("### Summary".to_string());
    out.push(String::new());

    let regressions = comparison.regressions();
    let improvements = comparison.improvements();
    if !regressions.is_empty() {
        out.push("#### ⚠️ Performance Regressions".to_string());
        out.push(String::new());
        for entry in &regressions {
            out.push(format!(
                "- `{}`: {:.1}% slower",
                entry.id,
                entry.delta_pct.unwrap_or_default()
            ));
        }
        out.push(String::new());
    }
    if !improvements.is_empty() {
        out.push("#### ✅ Performance Improvements".to_string());
        out.push(String::new());
        for entry in &improvements {
            out.push(format!(
                "- `{}`: {:.1}% faster",
                entry.id,
                -entry.delta_pct.unwrap_or_default()
            ));
        }
        out.push(String::new());
    }
    if regressions.is_empty() && improvements.is_empty() {
        out.push(format!(
            "{NO_SIGNIFICANT_CHANGE} (threshold: ±{}%)",
            policy.noise_band_pct
        ));
        out.push(String::new());
    }
    let new = comparison.count(Classification::New);
    let removed = comparison.count(Classification::Removed);
    if new + removed > 0 {
        out.push(format!("{new} new, {removed} removed benchmark(s)."));
        out.push(String::new());
    }
    out.join("\n")
}

/// Report for a run without a baseline: the current timings only.
pub fn render_first_run_report(current: &ResultSet) -> String {
    let mut out = vec![
        "## Benchmark Results (First Run)".to_string(),
        String::new(),
        "| Benchmark | Time |".to_string(),
        "|-----------|------|".to_string(),
    ];
    for result in current {
        out.push(format!("| `{}` | {} |", result.id, format_time(result.mean)));
    }
    out.push(String::new());
    out.join("\n")
}

/// Inputs shared by the narrative reports.
#[derive(Clone, Copy, Debug)]
pub struct NarrativeContext<'a> {
    pub config: &'a ReportConfig,
    pub generated: &'a str,
    pub revision: Option<&'a str>,
}

/// Operation x engine throughput table, relative performance of the subject
/// engine against the reference engine, and recommendations.
pub fn render_engine_comparison(results: &ResultSet, ctx: &NarrativeContext<'_>) -> String {
    let config = ctx.config;
    let mut out = vec![
        "# Database Comparison Report".to_string(),
        String::new(),
        format!("Generated: {}", ctx.generated),
        String::new(),
    ];
    if results.is_empty() {
        out.push("No benchmark results found. Run benchmarks first:".to_string());
        out.push(format!("  cargo bench --bench {}", config.engine_suite));
        out.push(String::new());
        return out.join("\n");
    }

    let pivot = EnginePivot::from_results(results);
    out.push("## Throughput by Operation".to_string());
    out.push(String::new());
    out.extend(pivot_table(&pivot));
    out.push(String::new());

    out.push("## Summary".to_string());
    out.push(String::new());
    let reference = &config.reference_engine;
    let subject = &config.subject_engine;
    out.push(format!("### Relative Performance (vs {})", reference.label));
    out.push(String::new());
    let ratios = pivot.relative_throughput(&reference.id, &subject.id);
    if ratios.is_empty() {
        out.push(format!(
            "No operations with data for both {} and {}.",
            subject.label, reference.label
        ));
    }
    for (operation, ratio) in ratios {
        let direction = if ratio > 1.0 { "faster" } else { "slower" };
        out.push(format!(
            "- **{operation}**: {} is {ratio:.2}x {direction} than {}",
            subject.label, reference.label
        ));
    }
    out.push(String::new());

    if !config.engine_notes.is_empty() {
        out.push("### Engine Guidance".to_string());
        out.push(String::new());
        for note in &config.engine_notes {
            out.push(format!("- **Use {} when**: {}", note.engine, note.when));
        }
        out.push(String::new());
    }

    let recommendations = config
        .recommender()
        .evaluate(&MetricSample::from_results(results));
    out.extend(recommendation_section("### Recommendations", &recommendations));
    out.join("\n")
}

fn pivot_table(pivot: &EnginePivot) -> Vec<String> {
    if pivot.is_empty() {
        return vec!["No data available".to_string()];
    }
    let engines: Vec<&str> = pivot.engines().collect();
    let mut rows = vec![
        format!("| Operation | {} |", engines.join(" | ")),
        format!("|-----------|{}", "------|".repeat(engines.len())),
    ];
    for operation in pivot.operations() {
        let cells: Vec<String> = engines
            .iter()
            .map(|engine| match pivot.get(operation, engine) {
                Some(result) => format_mean_throughput(result.mean),
                None => "N/A".to_string(),
            })
            .collect();
        rows.push(format!("| {operation} | {} |", cells.join(" | ")));
    }
    rows
}

/// Per-category throughput listings for one engine, performance
/// characteristics, the absolute-threshold regression check, and
/// recommendations.
pub fn render_detail_report(results: &ResultSet, ctx: &NarrativeContext<'_>) -> String {
    let config = ctx.config;
    let mut out = vec![
        format!("# {} Performance Report", config.subject_engine.label),
        String::new(),
        format!("Generated: {}", ctx.generated),
    ];
    if let Some(revision) = ctx.revision {
        out.push(format!("Revision: {revision}"));
    }
    out.push(String::new());
    if results.is_empty() {
        out.push("No benchmark results found. Run benchmarks first:".to_string());
        out.push(format!("  cargo bench --bench {}", config.detail_suite));
        out.push(String::new());
        return out.join("\n");
    }

    for category in config.categorizer().categorize(results) {
        out.push(format!("## {}", category.title()));
        out.push(String::new());
        for result in &category.results {
            out.push(format!(
                "- **{}**: {} (±{})",
                result.id,
                format_mean_throughput(result.mean),
                format_millis(result.std_dev)
            ));
        }
        out.push(String::new());
    }

    out.push("## Performance Characteristics".to_string());
    out.push(String::new());
    let characteristics = [
        ("Value Size Impact", "overflow", " per operation"),
        ("Concurrency Scalability", "concurrent", ""),
    ];
    for (heading, needle, suffix) in characteristics {
        let matching: Vec<_> = results.iter().filter(|r| r.id.contains(needle)).collect();
        if matching.is_empty() {
            continue;
        }
        out.push(format!("### {heading}"));
        out.push(String::new());
        for result in matching {
            out.push(format!("- {}: {}{suffix}", result.id, format_millis(result.mean)));
        }
        out.push(String::new());
    }

    out.push("## Regression Check".to_string());
    out.push(String::new());
    match config.gate().evaluate_results(results) {
        GateOutcome::Pass => out.push("✅ No performance regressions detected".to_string()),
        GateOutcome::Fail(violations) => {
            out.push("⚠️ **Performance Regressions Detected:**".to_string());
            out.push(String::new());
            out.extend(violations.iter().map(violation_line));
        }
    }
    out.push(String::new());

    let recommendations = config
        .recommender()
        .evaluate(&MetricSample::from_results(results));
    out.extend(recommendation_section("## Recommendations", &recommendations));
    out.join("\n")
}

fn violation_line(violation: &GateViolation) -> String {
    match violation {
        GateViolation::AbsoluteLimit {
            id, mean, limit, ..
        } => format!(
            "- **{id}**: {} (threshold: {})",
            format_millis(*mean),
            format_millis(*limit)
        ),
        GateViolation::DeltaLimit {
            id,
            delta_pct,
            limit_pct,
        } => format!("- **{id}**: {delta_pct:.1}% slower (limit: {limit_pct:.1}%)"),
    }
}

fn recommendation_section(heading: &str, recommendations: &[Recommendation]) -> Vec<String> {
    let mut out = vec![heading.to_string(), String::new()];
    out.extend(recommendations.iter().map(Recommendation::to_markdown));
    out.push(String::new());
    out
}

/// Both narrative reports per `mode`, separated by a rule when both are shown.
pub fn render_narrative(
    engine_results: &ResultSet,
    detail_results: &ResultSet,
    mode: ReportMode,
    ctx: &NarrativeContext<'_>,
) -> String {
    let mut sections = Vec::new();
    if mode.includes_engines() {
        sections.push(render_engine_comparison(engine_results, ctx));
    }
    if mode.includes_detail() {
        sections.push(render_detail_report(detail_results, ctx));
    }
    let separator = format!("\n{}\n\n", "=".repeat(80));
    sections.join(separator.as_str())
}
