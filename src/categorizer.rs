//! Grouping flat benchmark identifiers for the narrative reports.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{BenchmarkResult, ResultSet};

/// One named bucket of results, sorted by identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub name: String,
    pub results: Vec<BenchmarkResult>,
}

impl Category {
    /// `btree_operations` becomes `Btree Operations`.
    pub fn title(&self) -> String {
        title_case(&self.name)
    }
}

pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assigns identifiers to a fixed list of top-level category names by prefix.
#[derive(Clone, Debug)]
pub struct Categorizer {
    names: Vec<String>,
}

impl Categorizer {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The first configured category the identifier starts with.
    pub fn category_of(&self, id: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| id.starts_with(name.as_str()))
            .map(String::as_str)
    }

    /// Non-empty categories in configured order. Identifiers matching no
    /// category are left out.
    pub fn categorize(&self, results: &ResultSet) -> Vec<Category> {
        let mut buckets: Vec<Vec<BenchmarkResult>> = vec![Vec::new(); self.names.len()];
        for result in results {
            if let Some(idx) = self
                .names
                .iter()
                .position(|name| result.id.starts_with(name.as_str()))
            {
                buckets[idx].push(result.clone());
            }
        }
        self.names
            .iter()
            .zip(buckets)
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(name, mut bucket)| {
                bucket.sort_by(|a, b| a.id.cmp(&b.id));
                Category {
                    name: name.clone(),
                    results: bucket,
                }
            })
            .collect()
    }
}

/// Operation x engine view of `engine/operation[/...]` identifiers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnginePivot {
    operations: BTreeMap<String, BTreeMap<String, BenchmarkResult>>,
    engines: BTreeSet<String>,
}

impl EnginePivot {
    /// Identifiers with fewer than two segments cannot be compared across
    /// engines and are dropped. Deeper segments stay part of the operation key.
    pub fn from_results(results: &ResultSet) -> Self {
        let mut pivot = Self::default();
        for result in results {
            let Some((engine, operation)) = result.id.split_once('/') else {
                continue;
            };
            if engine.is_empty() || operation.is_empty() {
                continue;
            }
            pivot.engines.insert(engine.to_string());
            pivot
                .operations
                .entry(operation.to_string())
                .or_default()
                .insert(engine.to_string(), result.clone());
        }
        pivot
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn engines(&self) -> impl Iterator<Item = &str> {
        self.engines.iter().map(String::as_str)
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn get(&self, operation: &str, engine: &str) -> Option<&BenchmarkResult> {
        self.operations.get(operation)?.get(engine)
    }

    /// Throughput ratio `subject / reference` for every operation where both
    /// engines have data and the reference throughput is non-zero.
    pub fn relative_throughput(&self, reference: &str, subject: &str) -> Vec<(String, f64)> {
        self.operations
            .iter()
            .filter_map(|(operation, engines)| {
                let reference_tput = engines.get(reference)?.throughput();
                let subject_tput = engines.get(subject)?.throughput();
                if reference_tput <= 0.0 {
                    return None;
                }
                Some((operation.clone(), subject_tput / reference_tput))
            })
            .collect()
    }
}
