//! End-to-end runs behind the `benchdelta` binary. Each run renders its
//! report in full before the gate verdict is handed back to the caller.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    BenchDeltaError,
    comparator::{Comparison, compare_with},
    config::{ReportConfig, ReportMode},
    dashboard::DashboardData,
    gate::{GateOutcome, GateReport},
    model::{Provenance, ResultSet},
    parser::{ParseWarning, ResultSource},
    report::{NarrativeContext, render_diff_report, render_first_run_report, render_narrative},
};

pub const EXIT_GATE_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const DIFF_REPORT_FILE: &str = "benchmark-report.md";

#[derive(Clone, Debug)]
pub struct CompareRequest {
    pub baseline: ResultSource,
    pub current: ResultSource,
    pub output: PathBuf,
}

#[derive(Clone, Debug)]
pub struct CompareOutcome {
    pub markdown: String,
    pub comparison: Comparison,
    pub first_run: bool,
    pub gate: GateReport,
    pub warnings: Vec<ParseWarning>,
    pub report_path: PathBuf,
}

pub fn run_compare(
    request: &CompareRequest,
    config: &ReportConfig,
) -> Result<CompareOutcome, BenchDeltaError> {
    let mut warnings = Vec::new();
    let baseline = load(&request.baseline, Provenance::Baseline, config, &mut warnings)?;
    let current = load(&request.current, Provenance::Current, config, &mut warnings)?;

    let first_run = baseline.is_empty();
    let policy = config.policy();
    let (markdown, comparison, gate) = if first_run {
        info!("no baseline results found, this might be the first run");
        (
            render_first_run_report(&current),
            Comparison::default(),
            GateReport::from(GateOutcome::Pass),
        )
    } else {
        let comparison = compare_with(&baseline, &current, &policy);
        let markdown = render_diff_report(&comparison, &policy);
        let gate = GateReport::from(config.gate().evaluate_comparison(&comparison));
        (markdown, comparison, gate)
    };

    write_artifact(&request.output, &markdown)?;
    Ok(CompareOutcome {
        markdown,
        comparison,
        first_run,
        gate,
        warnings,
        report_path: request.output.clone(),
    })
}

#[derive(Clone, Debug)]
pub struct ReportRequest {
    /// Criterion output root; suites are looked up beneath it.
    pub criterion_dir: PathBuf,
    pub mode: ReportMode,
    pub generated: String,
    pub revision: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ReportOutcome {
    pub text: String,
    pub gate: GateReport,
    pub warnings: Vec<ParseWarning>,
}

pub fn run_report(
    request: &ReportRequest,
    config: &ReportConfig,
) -> Result<ReportOutcome, BenchDeltaError> {
    let mut warnings = Vec::new();
    let engine_results = if request.mode.includes_engines() {
        let source = ResultSource::StatsDirectory(request.criterion_dir.join(&config.engine_suite));
        load(&source, Provenance::Single, config, &mut warnings)?
    } else {
        ResultSet::empty(Provenance::Single)
    };
    let detail_results = if request.mode.includes_detail() {
        let source = ResultSource::StatsDirectory(request.criterion_dir.join(&config.detail_suite));
        load(&source, Provenance::Single, config, &mut warnings)?
    } else {
        ResultSet::empty(Provenance::Single)
    };

    let ctx = NarrativeContext {
        config,
        generated: &request.generated,
        revision: request.revision.as_deref(),
    };
    let text = render_narrative(&engine_results, &detail_results, request.mode, &ctx);
    let gate = GateReport::from(config.gate().evaluate_results(&detail_results));
    Ok(ReportOutcome {
        text,
        gate,
        warnings,
    })
}

#[derive(Clone, Debug)]
pub struct DashboardRequest {
    /// Both present: live comparison. Otherwise the illustrative set.
    pub runs: Option<(ResultSource, ResultSource)>,
    pub out_dir: PathBuf,
    pub generated: String,
}

#[derive(Clone, Debug)]
pub struct DashboardOutcome {
    pub data: DashboardData,
    pub page_path: PathBuf,
    pub warnings: Vec<ParseWarning>,
}

pub fn run_dashboard(
    request: &DashboardRequest,
    config: &ReportConfig,
) -> Result<DashboardOutcome, BenchDeltaError> {
    let policy = config.policy();
    let recommender = config.recommender();
    let mut warnings = Vec::new();
    let data = match &request.runs {
        Some((baseline, current)) => {
            let baseline = load(baseline, Provenance::Baseline, config, &mut warnings)?;
            let current = load(current, Provenance::Current, config, &mut warnings)?;
            let comparison = compare_with(&baseline, &current, &policy);
            DashboardData::from_comparison(
                &comparison,
                &policy,
                &recommender,
                request.generated.clone(),
            )
        }
        None => DashboardData::illustrative(&policy, &recommender, request.generated.clone()),
    };
    let page_path = data.write_page(&request.out_dir)?;
    Ok(DashboardOutcome {
        data,
        page_path,
        warnings,
    })
}

fn load(
    source: &ResultSource,
    provenance: Provenance,
    config: &ReportConfig,
    warnings: &mut Vec<ParseWarning>,
) -> Result<ResultSet, BenchDeltaError> {
    let report = source.load(provenance, &config.parse_options())?;
    if !report.warnings.is_empty() {
        warn!(
            source = %source.path().display(),
            count = report.warnings.len(),
            "input produced warnings"
        );
    }
    warnings.extend(report.warnings);
    Ok(report.results)
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), BenchDeltaError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| BenchDeltaError::io(format!("{}: {e}", parent.display())))?;
    }
    fs::write(path, contents)
        .map_err(|e| BenchDeltaError::io(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}
