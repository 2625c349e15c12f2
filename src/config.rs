//! Report and gate configuration.
//!
//! Every policy constant has a default equal to the fixed policy, so an empty
//! JSON object (or no file at all) reproduces the built-in behaviour:
//!
//! ```rust
//! use benchdelta::config::ReportConfig;
//!
//! let cfg: ReportConfig = serde_json::from_str("{}").unwrap();
//! assert_eq!(cfg, ReportConfig::default());
//! assert_eq!(cfg.hard_fail_pct, 10.0);
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    BenchDeltaError,
    categorizer::Categorizer,
    comparator::{ComparisonPolicy, EMPHASIS_BAND_PCT, NOISE_BAND_PCT},
    gate::{GateConfig, HARD_FAIL_PCT, RegressionGate, Threshold, default_thresholds},
    parser::ParseOptions,
    recommend::{GUIDANCE_RULES, Recommender},
};

/// Which narrative reports to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Operation x engine throughput comparison only.
    CompareEngines,
    /// Detailed per-category report for the subject engine only.
    SingleEngine,
    #[default]
    Both,
}

impl ReportMode {
    /// Maps the two mutually exclusive flags onto a mode; neither means both.
    pub fn from_flags(compare_engines: bool, single_engine: bool) -> Result<Self, BenchDeltaError> {
        match (compare_engines, single_engine) {
            (true, true) => Err(BenchDeltaError::config(
                "--compare-engines and --single-engine are mutually exclusive",
            )),
            (true, false) => Ok(ReportMode::CompareEngines),
            (false, true) => Ok(ReportMode::SingleEngine),
            (false, false) => Ok(ReportMode::Both),
        }
    }

    pub fn includes_engines(self) -> bool {
        matches!(self, ReportMode::CompareEngines | ReportMode::Both)
    }

    pub fn includes_detail(self) -> bool {
        matches!(self, ReportMode::SingleEngine | ReportMode::Both)
    }
}

/// An engine as it appears in identifiers (`id`) and in prose (`label`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRef {
    pub id: String,
    pub label: String,
}

impl EngineRef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Static "use X when" guidance printed with the engine comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineNote {
    pub engine: String,
    pub when: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub noise_band_pct: f64,
    pub emphasis_band_pct: f64,
    pub hard_fail_pct: f64,
    pub thresholds: Vec<Threshold>,
    pub categories: Vec<String>,
    pub reference_engine: EngineRef,
    pub subject_engine: EngineRef,
    /// Suite directory holding `engine/operation` benchmarks.
    pub engine_suite: String,
    /// Suite directory holding the subject engine's detailed benchmarks.
    pub detail_suite: String,
    pub engine_notes: Vec<EngineNote>,
    /// Worker threads for directory parsing; `None` uses available parallelism.
    pub parse_workers: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            noise_band_pct: NOISE_BAND_PCT,
            emphasis_band_pct: EMPHASIS_BAND_PCT,
            hard_fail_pct: HARD_FAIL_PCT,
            thresholds: default_thresholds(),
            categories: default_categories(),
            reference_engine: EngineRef::new("lmdb", "LMDB"),
            subject_engine: EngineRef::new("zerodb", "ZeroDB"),
            engine_suite: "database_comparison".to_string(),
            detail_suite: "zerodb_performance".to_string(),
            engine_notes: default_engine_notes(),
            parse_workers: None,
        }
    }
}

pub fn default_categories() -> Vec<String> {
    [
        "btree_operations",
        "page_allocation",
        "overflow_handling",
        "cursor_operations",
        "transaction_overhead",
        "durability_modes",
        "concurrent_operations",
        "memory_efficiency",
        "special_patterns",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_engine_notes() -> Vec<EngineNote> {
    [
        ("ZeroDB", "Sequential write performance is critical"),
        ("LMDB", "Random write performance is needed"),
        ("RocksDB", "Compression is required"),
        ("redb", "Pure Rust is mandatory"),
    ]
    .into_iter()
    .map(|(engine, when)| EngineNote {
        engine: engine.to_string(),
        when: when.to_string(),
    })
    .collect()
}

impl ReportConfig {
    pub fn from_path(path: &Path) -> Result<Self, BenchDeltaError> {
        let data = fs::read(path)
            .map_err(|e| BenchDeltaError::config(format!("{}: {e}", path.display())))?;
        let config: ReportConfig = serde_json::from_slice(&data)
            .map_err(|e| BenchDeltaError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BenchDeltaError> {
        for (name, value) in [
            ("noise_band_pct", self.noise_band_pct),
            ("emphasis_band_pct", self.emphasis_band_pct),
            ("hard_fail_pct", self.hard_fail_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BenchDeltaError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.emphasis_band_pct > self.noise_band_pct {
            return Err(BenchDeltaError::config(
                "emphasis_band_pct must not exceed noise_band_pct",
            ));
        }
        if let Some(threshold) = self
            .thresholds
            .iter()
            .find(|t| t.pattern.is_empty() || !t.limit.is_finite())
        {
            return Err(BenchDeltaError::config(format!(
                "threshold {:?} needs a non-empty pattern and a finite limit",
                threshold.pattern
            )));
        }
        if self.parse_workers == Some(0) {
            return Err(BenchDeltaError::config("parse_workers must be at least 1"));
        }
        Ok(())
    }

    pub fn policy(&self) -> ComparisonPolicy {
        ComparisonPolicy {
            noise_band_pct: self.noise_band_pct,
            emphasis_band_pct: self.emphasis_band_pct,
        }
    }

    pub fn gate(&self) -> RegressionGate {
        RegressionGate::new(GateConfig {
            thresholds: self.thresholds.clone(),
            hard_fail_pct: self.hard_fail_pct,
        })
    }

    pub fn categorizer(&self) -> Categorizer {
        Categorizer::new(self.categories.iter().cloned())
    }

    pub fn recommender(&self) -> Recommender {
        Recommender::new(self.hard_fail_pct, GUIDANCE_RULES.to_vec())
    }

    pub fn parse_options(&self) -> ParseOptions {
        match self.parse_workers {
            Some(workers) => ParseOptions { workers },
            None => ParseOptions::default(),
        }
    }
}
