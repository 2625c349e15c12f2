//! Rule-based performance advice shared by the narrative report and the
//! dashboard. Rules are evaluated in table order.

use serde::Serialize;

use crate::{comparator::delta_pct, gate::HARD_FAIL_PCT, model::ResultSet};

/// A named measurement as seen by the rules. Times are seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub current: f64,
    pub baseline: Option<f64>,
}

impl MetricSample {
    pub fn from_results(results: &ResultSet) -> Vec<Self> {
        results
            .iter()
            .map(|r| MetricSample {
                name: r.id.clone(),
                current: r.mean,
                baseline: None,
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuidanceRule {
    /// Matched as a substring of the metric name.
    pub metric: &'static str,
    pub max_secs: f64,
    pub subject: &'static str,
    pub advice: &'static str,
}

pub const GUIDANCE_RULES: &[GuidanceRule] = &[
    GuidanceRule {
        metric: "sequential_writes",
        max_secs: 500e-6,
        subject: "Sequential writes",
        advice: "Consider implementing bulk insert optimization or increasing page size for sequential workloads.",
    },
    GuidanceRule {
        metric: "random_reads",
        max_secs: 100e-6,
        subject: "Random reads",
        advice: "Implement caching for frequently accessed pages or add a bloom filter for non-existent keys.",
    },
    GuidanceRule {
        metric: "page_allocation",
        max_secs: 400e-9,
        subject: "Page allocation",
        advice: "Implement a freelist cache or batch page allocations to reduce overhead.",
    },
];

pub const WITHIN_BOUNDS: &str = "All operations are performing within expected bounds.";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub subject: Option<String>,
    pub advice: String,
}

impl Recommendation {
    pub fn to_markdown(&self) -> String {
        match &self.subject {
            Some(subject) => format!("- **{subject}:** {}", self.advice),
            None => format!("- {}", self.advice),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Recommender {
    regression_pct: f64,
    rules: Vec<GuidanceRule>,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(HARD_FAIL_PCT, GUIDANCE_RULES.to_vec())
    }
}

impl Recommender {
    pub fn new(regression_pct: f64, rules: Vec<GuidanceRule>) -> Self {
        Self {
            regression_pct,
            rules,
        }
    }

    /// Per-metric regressions first, then guidance rules, then the
    /// within-bounds fallback when nothing fired.
    pub fn evaluate(&self, samples: &[MetricSample]) -> Vec<Recommendation> {
        let mut out = Vec::new();
        for sample in samples {
            let Some(change) = sample
                .baseline
                .and_then(|baseline| delta_pct(baseline, sample.current))
            else {
                continue;
            };
            if change > self.regression_pct {
                out.push(Recommendation {
                    subject: Some(sample.name.clone()),
                    advice: format!(
                        "{change:.1}% regression detected. Consider profiling this operation specifically."
                    ),
                });
            }
        }
        for rule in &self.rules {
            let worst = samples
                .iter()
                .filter(|s| s.name.contains(rule.metric))
                .map(|s| s.current)
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
            if worst.is_some_and(|value| value > rule.max_secs) {
                out.push(Recommendation {
                    subject: Some(rule.subject.to_string()),
                    advice: rule.advice.to_string(),
                });
            }
        }
        if out.is_empty() {
            out.push(Recommendation {
                subject: None,
                advice: WITHIN_BOUNDS.to_string(),
            });
        }
        out
    }
}
