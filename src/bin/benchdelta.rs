use std::{path::PathBuf, process};

use benchdelta::{
    BenchDeltaError, ReportConfig, ReportMode, ResultSource,
    app::{
        CompareRequest, DIFF_REPORT_FILE, DashboardRequest, EXIT_GATE_FAILURE, EXIT_USAGE,
        ReportRequest, run_compare, run_dashboard, run_report,
    },
    gate::GateReport,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "benchdelta", about = "Compare, gate and report Criterion benchmark results")]
struct Cli {
    /// Policy file (JSON); built-in thresholds when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diff a baseline run against a current run and write a Markdown report.
    Compare {
        #[arg(long)]
        baseline: PathBuf,
        #[arg(long)]
        current: PathBuf,
        #[arg(long, value_enum, default_value_t = Layout::Stream)]
        layout: Layout,
        #[arg(long, default_value = DIFF_REPORT_FILE)]
        output: PathBuf,
    },
    /// Print the narrative report(s) for a Criterion output directory.
    Report(ReportArgs),
    /// Write the static performance dashboard page.
    Dashboard {
        /// Baseline input; requires --current. Illustrative data when omitted.
        #[arg(long, requires = "current")]
        baseline: Option<PathBuf>,
        #[arg(long, requires = "baseline")]
        current: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Layout::Stream)]
        layout: Layout,
        #[arg(long, default_value = "target")]
        out_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(long, default_value = "target/criterion")]
    criterion_dir: PathBuf,
    /// Only the cross-engine comparison report.
    #[arg(long, conflicts_with = "single_engine")]
    compare_engines: bool,
    /// Only the detailed single-engine report.
    #[arg(long)]
    single_engine: bool,
    /// Revision shown in the detailed report header.
    #[arg(long)]
    revision: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Newline-delimited `benchmark-complete` records.
    Stream,
    /// Directory tree of `base/estimates.json` files.
    Directory,
}

impl Layout {
    fn source(self, path: PathBuf) -> ResultSource {
        match self {
            Layout::Stream => ResultSource::EventStream(path),
            Layout::Directory => ResultSource::StatsDirectory(path),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(EXIT_USAGE);
        }
    };

    match run(cli.command, &config) {
        Ok(gate) if gate.passed => {}
        Ok(gate) => {
            for reason in &gate.reasons {
                eprintln!("ERROR: {reason}");
            }
            process::exit(EXIT_GATE_FAILURE);
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(EXIT_USAGE);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<ReportConfig, BenchDeltaError> {
    match path {
        Some(path) => ReportConfig::from_path(path),
        None => Ok(ReportConfig::default()),
    }
}

fn run(command: Command, config: &ReportConfig) -> Result<GateReport, BenchDeltaError> {
    match command {
        Command::Compare {
            baseline,
            current,
            layout,
            output,
        } => {
            let request = CompareRequest {
                baseline: layout.source(baseline),
                current: layout.source(current),
                output,
            };
            let outcome = run_compare(&request, config)?;
            println!(
                "Benchmark comparison complete: {}",
                outcome.report_path.display()
            );
            Ok(outcome.gate)
        }
        Command::Report(args) => {
            let request = ReportRequest {
                criterion_dir: args.criterion_dir,
                mode: ReportMode::from_flags(args.compare_engines, args.single_engine)?,
                generated: timestamp(),
                revision: args.revision,
            };
            let outcome = run_report(&request, config)?;
            println!("{}", outcome.text);
            Ok(outcome.gate)
        }
        Command::Dashboard {
            baseline,
            current,
            layout,
            out_dir,
        } => {
            let runs = match (baseline, current) {
                (Some(baseline), Some(current)) => {
                    Some((layout.source(baseline), layout.source(current)))
                }
                _ => None,
            };
            let request = DashboardRequest {
                runs,
                out_dir,
                generated: timestamp(),
            };
            let outcome = run_dashboard(&request, config)?;
            println!(
                "Performance dashboard generated: {}",
                outcome.page_path.display()
            );
            Ok(GateReport {
                passed: true,
                reasons: Vec::new(),
            })
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
