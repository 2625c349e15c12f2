//! Pass/fail regression gate over single snapshots (absolute limits) and
//! comparisons (delta limits), kept separate from report text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{comparator::Comparison, model::ResultSet};

/// Delta, in percent, past which a comparison blocks CI.
pub const HARD_FAIL_PCT: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    #[default]
    Substring,
    Prefix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMetric {
    /// Mean in seconds.
    AbsoluteMean,
    /// Comparison delta in percent.
    DeltaPercent,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub pattern: String,
    #[serde(default)]
    pub kind: PatternKind,
    pub limit: f64,
    pub metric: ThresholdMetric,
}

impl Threshold {
    pub fn absolute(pattern: impl Into<String>, max_secs: f64) -> Self {
        Self {
            pattern: pattern.into(),
            kind: PatternKind::Substring,
            limit: max_secs,
            metric: ThresholdMetric::AbsoluteMean,
        }
    }

    pub fn delta(pattern: impl Into<String>, max_pct: f64) -> Self {
        Self {
            pattern: pattern.into(),
            kind: PatternKind::Substring,
            limit: max_pct,
            metric: ThresholdMetric::DeltaPercent,
        }
    }

    pub fn prefix(mut self) -> Self {
        self.kind = PatternKind::Prefix;
        self
    }

    pub fn matches(&self, id: &str) -> bool {
        match self.kind {
            PatternKind::Substring => id.contains(self.pattern.as_str()),
            PatternKind::Prefix => id.starts_with(self.pattern.as_str()),
        }
    }
}

pub fn default_thresholds() -> Vec<Threshold> {
    vec![
        Threshold::absolute("sequential_insert", 0.001),
        Threshold::absolute("random_reads", 0.002),
        Threshold::absolute("forward_iteration", 0.0001),
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    pub thresholds: Vec<Threshold>,
    pub hard_fail_pct: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            hard_fail_pct: HARD_FAIL_PCT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GateViolation {
    AbsoluteLimit {
        id: String,
        pattern: String,
        mean: f64,
        limit: f64,
    },
    DeltaLimit {
        id: String,
        delta_pct: f64,
        limit_pct: f64,
    },
}

impl GateViolation {
    pub fn id(&self) -> &str {
        match self {
            GateViolation::AbsoluteLimit { id, .. } | GateViolation::DeltaLimit { id, .. } => id,
        }
    }
}

impl fmt::Display for GateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateViolation::AbsoluteLimit {
                id, mean, limit, ..
            } => write!(
                f,
                "{id} exceeds threshold: {:.2}ms (threshold: {:.2}ms)",
                mean * 1000.0,
                limit * 1000.0
            ),
            GateViolation::DeltaLimit {
                id,
                delta_pct,
                limit_pct,
            } => write!(
                f,
                "significant regression in {id}: {delta_pct:.1}% (limit {limit_pct:.1}%)"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GateOutcome {
    Pass,
    Fail(Vec<GateViolation>),
}

/// Pass/fail decision over results or comparisons. Never mutates its input.
#[derive(Clone, Debug)]
pub struct RegressionGate {
    absolute: Vec<Threshold>,
    relative: Vec<Threshold>,
    hard_fail_pct: f64,
}

impl Default for RegressionGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

impl RegressionGate {
    pub fn new(config: GateConfig) -> Self {
        let (absolute, relative): (Vec<_>, Vec<_>) = config
            .thresholds
            .into_iter()
            .partition(|t| t.metric == ThresholdMetric::AbsoluteMean);
        Self {
            absolute,
            relative,
            hard_fail_pct: config.hard_fail_pct,
        }
    }

    pub fn hard_fail_pct(&self) -> f64 {
        self.hard_fail_pct
    }

    /// Single-snapshot mode: every matching absolute threshold is checked
    /// against the result's mean.
    pub fn evaluate_results(&self, results: &ResultSet) -> GateOutcome {
        let mut failures = Vec::new();
        for result in results {
            for threshold in self.absolute.iter().filter(|t| t.matches(&result.id)) {
                if result.mean > threshold.limit {
                    failures.push(GateViolation::AbsoluteLimit {
                        id: result.id.clone(),
                        pattern: threshold.pattern.clone(),
                        mean: result.mean,
                        limit: threshold.limit,
                    });
                }
            }
        }
        outcome(failures)
    }

    /// Comparison mode: any quantified delta above the hard-fail percentage,
    /// or above a matching per-pattern delta threshold, fails the gate.
    /// Entries without a delta (new, removed, zero baseline) never fail.
    pub fn evaluate_comparison(&self, comparison: &Comparison) -> GateOutcome {
        let mut failures = Vec::new();
        for entry in &comparison.entries {
            let Some(delta) = entry.delta_pct else {
                continue;
            };
            let limit = self
                .relative
                .iter()
                .filter(|t| t.matches(&entry.id))
                .map(|t| t.limit)
                .fold(self.hard_fail_pct, f64::min);
            if delta > limit {
                failures.push(GateViolation::DeltaLimit {
                    id: entry.id.clone(),
                    delta_pct: delta,
                    limit_pct: limit,
                });
            }
        }
        outcome(failures)
    }
}

fn outcome(failures: Vec<GateViolation>) -> GateOutcome {
    if failures.is_empty() {
        GateOutcome::Pass
    } else {
        GateOutcome::Fail(failures)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GateReport {
    pub passed: bool,
    pub reasons: Vec<String>,
}

impl From<GateOutcome> for GateReport {
    fn from(outcome: GateOutcome) -> Self {
        match outcome {
            GateOutcome::Pass => GateReport {
                passed: true,
                reasons: Vec::new(),
            },
            GateOutcome::Fail(violations) => GateReport {
                passed: false,
                reasons: violations.iter().map(ToString::to_string).collect(),
            },
        }
    }
}
