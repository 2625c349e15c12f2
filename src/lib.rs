//! Benchmark result comparison, regression gating and reporting.
//! Reads Criterion output from `target/criterion` or a `benchmark-complete` record stream.

pub mod app;
pub mod categorizer;
pub mod comparator;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod format;
pub mod gate;
pub mod model;
pub mod parser;
pub mod recommend;
pub mod report;
pub mod synthetic;

pub use crate::categorizer::{Category, Categorizer, EnginePivot};
pub use crate::comparator::{Classification, Comparison, ComparisonEntry, ComparisonPolicy, compare};
pub use crate::config::{ReportConfig, ReportMode};
pub use crate::dashboard::{DashboardData, DashboardMetric};
pub use crate::errors::BenchDeltaError;
pub use crate::gate::{GateOutcome, GateReport, RegressionGate, Threshold};
pub use crate::model::{BenchmarkResult, Provenance, ResultSet};
pub use crate::parser::{ParseOptions, ParseReport, ParseWarning, ResultSource};
