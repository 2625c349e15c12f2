//! Baseline/current comparison and per-benchmark classification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::ResultSet;

/// Relative change, in percent, past which an entry is classified.
pub const NOISE_BAND_PCT: f64 = 5.0;
/// Relative change, in percent, past which a report adds a visual marker.
pub const EMPHASIS_BAND_PCT: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPolicy {
    pub noise_band_pct: f64,
    pub emphasis_band_pct: f64,
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self {
            noise_band_pct: NOISE_BAND_PCT,
            emphasis_band_pct: EMPHASIS_BAND_PCT,
        }
    }
}

impl ComparisonPolicy {
    /// Classifies an identifier from its two optional means.
    ///
    /// A zero baseline has no percentage. Against a nonzero current it is
    /// `New`, against a zero current `Unchanged`; both carry `delta_pct = None`.
    pub fn classify(&self, baseline: Option<f64>, current: Option<f64>) -> Classification {
        match (baseline, current) {
            (None, Some(_)) => Classification::New,
            (Some(_), None) => Classification::Removed,
            (None, None) => Classification::Unchanged,
            (Some(base), Some(cur)) if base == 0.0 && cur != 0.0 => Classification::New,
            (Some(base), Some(cur)) => match delta_pct(base, cur) {
                Some(delta) if delta > self.noise_band_pct => Classification::Regression,
                Some(delta) if delta < -self.noise_band_pct => Classification::Improvement,
                _ => Classification::Unchanged,
            },
        }
    }

    /// Display-only emphasis; never affects classification.
    pub fn emphasis(&self, delta_pct: f64) -> Emphasis {
        if delta_pct > self.noise_band_pct {
            Emphasis::Slower
        } else if delta_pct > self.emphasis_band_pct {
            Emphasis::SlightlySlower
        } else if delta_pct < -self.noise_band_pct {
            Emphasis::Faster
        } else {
            Emphasis::None
        }
    }
}

/// `(current - baseline) / baseline * 100`, undefined for a zero baseline.
pub fn delta_pct(baseline: f64, current: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    New,
    Removed,
    Regression,
    Improvement,
    Unchanged,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Classification::New => "New",
            Classification::Removed => "Removed",
            Classification::Regression => "Regression",
            Classification::Improvement => "Improvement",
            Classification::Unchanged => "Unchanged",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    None,
    SlightlySlower,
    Slower,
    Faster,
}

impl Emphasis {
    pub fn marker(self) -> &'static str {
        match self {
            Emphasis::None => "",
            Emphasis::SlightlySlower => "🟡",
            Emphasis::Slower => "🔴",
            Emphasis::Faster => "🟢",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub id: String,
    pub baseline: Option<f64>,
    pub current: Option<f64>,
    pub delta_pct: Option<f64>,
    pub classification: Classification,
}

impl ComparisonEntry {
    pub fn is_regression(&self) -> bool {
        self.classification == Classification::Regression
    }

    pub fn is_improvement(&self) -> bool {
        self.classification == Classification::Improvement
    }
}

/// Entries for the union of both sets' identifiers, ordered by identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub entries: Vec<ComparisonEntry>,
}

impl Comparison {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ComparisonEntry> {
        self.entries
            .binary_search_by(|entry| entry.id.as_str().cmp(id))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Regressions, largest slowdown first.
    pub fn regressions(&self) -> Vec<&ComparisonEntry> {
        let mut found: Vec<_> = self.entries.iter().filter(|e| e.is_regression()).collect();
        found.sort_by(|a, b| magnitude(b).total_cmp(&magnitude(a)));
        found
    }

    /// Improvements, largest speedup first.
    pub fn improvements(&self) -> Vec<&ComparisonEntry> {
        let mut found: Vec<_> = self.entries.iter().filter(|e| e.is_improvement()).collect();
        found.sort_by(|a, b| magnitude(b).total_cmp(&magnitude(a)));
        found
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.entries
            .iter()
            .filter(|e| e.classification == classification)
            .count()
    }
}

fn magnitude(entry: &ComparisonEntry) -> f64 {
    entry.delta_pct.map(f64::abs).unwrap_or(0.0)
}

pub fn compare(baseline: &ResultSet, current: &ResultSet) -> Comparison {
    compare_with(baseline, current, &ComparisonPolicy::default())
}

pub fn compare_with(
    baseline: &ResultSet,
    current: &ResultSet,
    policy: &ComparisonPolicy,
) -> Comparison {
    let ids: BTreeSet<&str> = baseline.ids().chain(current.ids()).collect();
    let entries = ids
        .into_iter()
        .map(|id| {
            let base = baseline.get(id).map(|r| r.mean);
            let cur = current.get(id).map(|r| r.mean);
            let delta = match (base, cur) {
                (Some(b), Some(c)) => delta_pct(b, c),
                _ => None,
            };
            ComparisonEntry {
                id: id.to_string(),
                baseline: base,
                current: cur,
                delta_pct: delta,
                classification: policy.classify(base, cur),
            }
        })
        .collect();
    Comparison { entries }
}
