//! Parsed benchmark measurements and the immutable sets they live in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nanoseconds per second; harness output is always nanoseconds.
pub const NANOS_PER_SEC: f64 = 1e9;

pub fn nanos_to_secs(nanos: f64) -> f64 {
    nanos / NANOS_PER_SEC
}

/// One measured operation. All times are seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub id: String,
    pub mean: f64,
    pub std_dev: f64,
    pub median: Option<f64>,
    pub sample_count: Option<u64>,
    pub unit: Option<String>,
}

impl BenchmarkResult {
    pub fn new(id: impl Into<String>, mean: f64, std_dev: f64) -> Self {
        Self {
            id: id.into(),
            mean,
            std_dev,
            median: None,
            sample_count: None,
            unit: None,
        }
    }

    pub fn with_median(mut self, median: f64) -> Self {
        self.median = Some(median);
        self
    }

    pub fn with_sample_count(mut self, samples: u64) -> Self {
        self.sample_count = Some(samples);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Operations per second, zero when the mean is not positive.
    pub fn throughput(&self) -> f64 {
        if self.mean > 0.0 { 1.0 / self.mean } else { 0.0 }
    }

    pub fn summary(&self) -> String {
        match self.sample_count {
            Some(samples) => format!(
                "{}: mean={:.9}s std_dev={:.9}s samples={}",
                self.id, self.mean, self.std_dev, samples
            ),
            None => format!(
                "{}: mean={:.9}s std_dev={:.9}s",
                self.id, self.mean, self.std_dev
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Baseline,
    Current,
    Single,
}

/// Identifier-keyed results from one parse. Iteration is ordered by identifier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultSet {
    provenance: Provenance,
    results: BTreeMap<String, BenchmarkResult>,
}

impl ResultSet {
    pub fn empty(provenance: Provenance) -> Self {
        Self {
            provenance,
            results: BTreeMap::new(),
        }
    }

    pub fn builder(provenance: Provenance) -> ResultSetBuilder {
        ResultSetBuilder {
            provenance,
            results: BTreeMap::new(),
        }
    }

    pub fn from_results<I>(provenance: Provenance, results: I) -> Self
    where
        I: IntoIterator<Item = BenchmarkResult>,
    {
        let mut builder = Self::builder(provenance);
        for result in results {
            builder.push(result);
        }
        builder.build()
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn get(&self, id: &str) -> Option<&BenchmarkResult> {
        self.results.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.results.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkResult> {
        self.results.values()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a BenchmarkResult;
    type IntoIter = std::collections::btree_map::Values<'a, String, BenchmarkResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.values()
    }
}

/// Accumulates results before freezing them into a [`ResultSet`].
///
/// A repeated identifier replaces the earlier entry (last write wins).
#[derive(Debug)]
pub struct ResultSetBuilder {
    provenance: Provenance,
    results: BTreeMap<String, BenchmarkResult>,
}

impl ResultSetBuilder {
    /// Returns the replaced result when the identifier was already present.
    pub fn push(&mut self, result: BenchmarkResult) -> Option<BenchmarkResult> {
        self.results.insert(result.id.clone(), result)
    }

    pub fn build(self) -> ResultSet {
        ResultSet {
            provenance: self.provenance,
            results: self.results,
        }
    }
}
