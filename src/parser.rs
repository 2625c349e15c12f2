//! Loading harness output into a [`ResultSet`].
//!
//! Two physical layouts are supported, selected explicitly through
//! [`ResultSource`] rather than by sniffing file content:
//!
//! - a Criterion-style statistics tree, where every directory holding
//!   `base/estimates.json` is one benchmark, and
//! - a newline-delimited stream of JSON records, of which only
//!   `benchmark-complete` records are consumed.
//!
//! Neither layout aborts on a missing location or a bad record. Those become
//! [`ParseWarning`]s on the returned [`ParseReport`]; only unexpected I/O
//! failures are errors.

use std::{
    fmt, fs,
    io::{self, BufRead, BufReader},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    BenchDeltaError,
    model::{BenchmarkResult, Provenance, ResultSet, nanos_to_secs},
};

const STATS_DIR: &str = "base";
const ESTIMATES_FILE: &str = "estimates.json";
const SAMPLE_FILE: &str = "sample.json";
const COMPLETE_REASON: &str = "benchmark-complete";
const SKIPPED_DIRS: &[&str] = &["report"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultSource {
    StatsDirectory(PathBuf),
    EventStream(PathBuf),
}

impl ResultSource {
    pub fn path(&self) -> &Path {
        match self {
            ResultSource::StatsDirectory(path) | ResultSource::EventStream(path) => path,
        }
    }

    pub fn load(
        &self,
        provenance: Provenance,
        options: &ParseOptions,
    ) -> Result<ParseReport, BenchDeltaError> {
        match self {
            ResultSource::StatsDirectory(root) => load_stats_directory(root, provenance, options),
            ResultSource::EventStream(path) => load_event_stream(path, provenance),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Worker threads used for the statistics tree. One means sequential.
    pub workers: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl ParseOptions {
    pub fn sequential() -> Self {
        Self { workers: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    MissingInput { path: PathBuf },
    MalformedRecord { location: String, reason: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MissingInput { path } => {
                write!(f, "{} not found", path.display())
            }
            ParseWarning::MalformedRecord { location, reason } => {
                write!(f, "skipped malformed record at {location}: {reason}")
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParseReport {
    pub results: ResultSet,
    pub warnings: Vec<ParseWarning>,
}

impl ParseReport {
    fn missing(path: &Path, provenance: Provenance) -> Self {
        let warning = ParseWarning::MissingInput {
            path: path.to_path_buf(),
        };
        warn!("{warning}");
        Self {
            results: ResultSet::empty(provenance),
            warnings: vec![warning],
        }
    }

    pub fn into_results(self) -> ResultSet {
        self.results
    }
}

#[derive(Deserialize)]
struct Estimate {
    #[serde(alias = "estimate")]
    point_estimate: f64,
}

#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
    std_dev: Estimate,
    #[serde(default)]
    median: Option<Estimate>,
}

#[derive(Deserialize)]
struct SampleFile {
    iters: Vec<f64>,
}

#[derive(Deserialize)]
struct CompleteRecord {
    id: String,
    median: Estimate,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    iteration_count: Option<Vec<f64>>,
}

#[derive(Debug)]
struct BenchTarget {
    id: String,
    dir: PathBuf,
}

enum TargetOutcome {
    Parsed(BenchmarkResult),
    Absent,
    Malformed(ParseWarning),
}

fn load_stats_directory(
    root: &Path,
    provenance: Provenance,
    options: &ParseOptions,
) -> Result<ParseReport, BenchDeltaError> {
    if !root.is_dir() {
        return Ok(ParseReport::missing(root, provenance));
    }
    let mut targets = Vec::new();
    discover_targets(root, root, &mut targets)?;
    targets.sort_by(|a, b| a.id.cmp(&b.id));
    debug!(
        root = %root.display(),
        benchmarks = targets.len(),
        "discovered benchmark directories"
    );

    let mut builder = ResultSet::builder(provenance);
    let mut warnings = Vec::new();
    for outcome in parse_targets(&targets, options.workers) {
        match outcome {
            TargetOutcome::Parsed(result) => {
                if let Some(previous) = builder.push(result) {
                    debug!(id = %previous.id, "duplicate benchmark id, keeping last");
                }
            }
            TargetOutcome::Absent => {}
            TargetOutcome::Malformed(warning) => {
                warn!("{warning}");
                warnings.push(warning);
            }
        }
    }
    Ok(ParseReport {
        results: builder.build(),
        warnings,
    })
}

fn discover_targets(
    root: &Path,
    dir: &Path,
    out: &mut Vec<BenchTarget>,
) -> Result<(), BenchDeltaError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BenchDeltaError::io(format!("{}: {e}", dir.display())))?;
    for entry in entries {
        let entry = entry.map_err(|e| BenchDeltaError::io(format!("{}: {e}", dir.display())))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
            continue;
        }
        if path.join(STATS_DIR).join(ESTIMATES_FILE).is_file() {
            out.push(BenchTarget {
                id: relative_id(root, &path),
                dir: path,
            });
        } else {
            discover_targets(root, &path, out)?;
        }
    }
    Ok(())
}

fn relative_id(root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parses every target, fanning out over `workers` threads. The returned
/// outcomes are always in target order regardless of scheduling.
fn parse_targets(targets: &[BenchTarget], workers: usize) -> Vec<TargetOutcome> {
    let workers = workers.clamp(1, targets.len().max(1));
    if workers == 1 {
        return targets.iter().map(parse_target).collect();
    }
    let cursor = AtomicUsize::new(0);
    let collected = Mutex::new(Vec::with_capacity(targets.len()));
    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    let idx = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(target) = targets.get(idx) else {
                        break;
                    };
                    let outcome = parse_target(target);
                    collected.lock().push((idx, outcome));
                }
            });
        }
    });
    let mut collected = collected.into_inner();
    collected.sort_by_key(|(idx, _)| *idx);
    collected.into_iter().map(|(_, outcome)| outcome).collect()
}

fn parse_target(target: &BenchTarget) -> TargetOutcome {
    let stats_dir = target.dir.join(STATS_DIR);
    let estimates_path = stats_dir.join(ESTIMATES_FILE);
    let data = match fs::read(&estimates_path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return TargetOutcome::Absent,
        Err(err) => return malformed(&estimates_path, err.to_string()),
    };
    let estimates: Estimates = match serde_json::from_slice(&data) {
        Ok(estimates) => estimates,
        Err(err) => return malformed(&estimates_path, err.to_string()),
    };
    let mean = estimates.mean.point_estimate;
    let std_dev = estimates.std_dev.point_estimate;
    if !valid_nanos(mean) || !valid_nanos(std_dev) {
        return malformed(
            &estimates_path,
            format!("non-finite or negative estimate (mean={mean}, std_dev={std_dev})"),
        );
    }
    let mut result = BenchmarkResult::new(
        target.id.clone(),
        nanos_to_secs(mean),
        nanos_to_secs(std_dev),
    );
    if let Some(median) = estimates.median.map(|m| m.point_estimate) {
        if valid_nanos(median) {
            result = result.with_median(nanos_to_secs(median));
        }
    }
    if let Some(samples) = read_sample_count(&stats_dir.join(SAMPLE_FILE)) {
        result = result.with_sample_count(samples);
    }
    debug!("parsed {}", result.summary());
    TargetOutcome::Parsed(result)
}

fn read_sample_count(path: &Path) -> Option<u64> {
    let data = fs::read(path).ok()?;
    match serde_json::from_slice::<SampleFile>(&data) {
        Ok(sample) => Some(sample.iters.len() as u64),
        Err(err) => {
            debug!(path = %path.display(), "ignoring unreadable sample file: {err}");
            None
        }
    }
}

fn malformed(path: &Path, reason: String) -> TargetOutcome {
    TargetOutcome::Malformed(ParseWarning::MalformedRecord {
        location: path.display().to_string(),
        reason,
    })
}

fn valid_nanos(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn load_event_stream(path: &Path, provenance: Provenance) -> Result<ParseReport, BenchDeltaError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(ParseReport::missing(path, provenance));
        }
        Err(err) => {
            return Err(BenchDeltaError::io(format!("{}: {err}", path.display())));
        }
    };
    parse_event_lines(BufReader::new(file), &path.display().to_string(), provenance)
}

/// Parses a `benchmark-complete` record stream from any reader.
pub fn parse_event_lines<R: BufRead>(
    reader: R,
    source_name: &str,
    provenance: Provenance,
) -> Result<ParseReport, BenchDeltaError> {
    let mut builder = ResultSet::builder(provenance);
    let mut warnings = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let location = format!("{source_name}:{}", idx + 1);
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                push_malformed(&mut warnings, location, err.to_string());
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_event_line(trimmed) {
            Ok(Some(result)) => {
                if let Some(previous) = builder.push(result) {
                    debug!(id = %previous.id, "duplicate benchmark id, keeping last");
                }
            }
            Ok(None) => {}
            Err(reason) => push_malformed(&mut warnings, location, reason),
        }
    }
    Ok(ParseReport {
        results: builder.build(),
        warnings,
    })
}

fn push_malformed(warnings: &mut Vec<ParseWarning>, location: String, reason: String) {
    let warning = ParseWarning::MalformedRecord { location, reason };
    warn!("{warning}");
    warnings.push(warning);
}

fn parse_event_line(line: &str) -> Result<Option<BenchmarkResult>, String> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
    if value.get("reason").and_then(|r| r.as_str()) != Some(COMPLETE_REASON) {
        return Ok(None);
    }
    let record: CompleteRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let median = record.median.point_estimate;
    if !valid_nanos(median) {
        return Err(format!("non-finite or negative median {median}"));
    }
    let secs = nanos_to_secs(median);
    // The stream only carries the median, which stands in for the mean.
    let mut result = BenchmarkResult::new(record.id, secs, 0.0).with_median(secs);
    if let Some(unit) = record.unit {
        result = result.with_unit(unit);
    }
    if let Some(counts) = record.iteration_count {
        result = result.with_sample_count(counts.len() as u64);
    }
    Ok(Some(result))
}
