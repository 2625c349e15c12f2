//! Human-scaled renderings of times, throughputs and deltas.

use crate::comparator::ComparisonPolicy;

/// Seconds to `ns` / `µs` / `ms` / `s`, picking the largest unit below the value.
pub fn format_time(secs: f64) -> String {
    let nanos = secs * 1e9;
    if nanos < 1_000.0 {
        format!("{nanos:.1}ns")
    } else if nanos < 1_000_000.0 {
        format!("{:.1}µs", nanos / 1_000.0)
    } else if nanos < 1_000_000_000.0 {
        format!("{:.1}ms", nanos / 1_000_000.0)
    } else {
        format!("{secs:.2}s")
    }
}

/// Operations per second with `K` / `M` suffixes at 1e3 / 1e6.
pub fn format_throughput(ops_per_sec: f64) -> String {
    if ops_per_sec >= 1_000_000.0 {
        format!("{:.2}M ops/s", ops_per_sec / 1_000_000.0)
    } else if ops_per_sec >= 1_000.0 {
        format!("{:.2}K ops/s", ops_per_sec / 1_000.0)
    } else {
        format!("{ops_per_sec:.2} ops/s")
    }
}

/// Throughput for a mean time; a non-positive mean is zero throughput.
pub fn format_mean_throughput(mean_secs: f64) -> String {
    let ops = if mean_secs > 0.0 { 1.0 / mean_secs } else { 0.0 };
    format_throughput(ops)
}

pub fn format_millis(secs: f64) -> String {
    format!("{:.2}ms", secs * 1000.0)
}

/// Signed percentage with the policy's emphasis marker, or `N/A`.
pub fn format_change(delta_pct: Option<f64>, policy: &ComparisonPolicy) -> String {
    let Some(delta) = delta_pct else {
        return "N/A".to_string();
    };
    let marker = policy.emphasis(delta).marker();
    let text = if delta > 0.0 {
        format!("+{delta:.1}%")
    } else {
        format!("{delta:.1}%")
    };
    if marker.is_empty() {
        text
    } else {
        format!("{text} {marker}")
    }
}
