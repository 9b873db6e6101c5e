//! Rossi-alpha CLI
//!
//! Builds time-difference histograms from detection event files.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use rayon::prelude::*;
use rossi_alpha::{
    config::Config,
    core::{
        parallel::merge_outcomes, scan_parallel, summarize_histogram, summarize_stream,
        BinGeometry, BinningType, CoincidencePolicy, ExportBuilder, ExportFormat, ScanOutcome,
        ScanSettings,
    },
    diagnostics::{create_shared_log_with_persistence, SharedRunLog},
    events::{load_events, LoadOptions},
    METHODS_GUIDE, VERSION,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rossi")]
#[command(version = VERSION)]
#[command(about = "Rossi-alpha time-difference histograms from detection events")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a histogram from one or more event files
    Analyze(AnalyzeArgs),

    /// Describe the binning types and coincidence policies
    Methods,

    /// Show configuration
    Config {
        /// Configuration file to read instead of the default
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show cumulative run statistics
    Status {
        /// Configuration file to read instead of the default
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Event files (text `time [channel]` lines, or JSON)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Configuration file to read instead of the default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Coincidence window length in nanoseconds
    #[arg(long)]
    reset_time: Option<f64>,

    /// Number of histogram bins
    #[arg(long, conflicts_with = "bin_width")]
    bins: Option<usize>,

    /// Bin width in nanoseconds (rounded to a whole number of bins)
    #[arg(long)]
    bin_width: Option<f64>,

    /// Binning type (type-i, type-ii, type-iii, time-interval)
    #[arg(long)]
    binning: Option<BinningType>,

    /// Coincidence policy (all-pairs, cross-channel, cross-channel-no-repeat,
    /// cross-channel-no-repeat-deadtime)
    #[arg(long)]
    policy: Option<String>,

    /// Dead-time delay in nanoseconds (dead-time policy only)
    #[arg(long)]
    delay: Option<f64>,

    /// Anchor-range partitions per stream for parallel Type I scans
    #[arg(long)]
    partitions: Option<usize>,

    /// Multiplier converting file times into nanoseconds
    #[arg(long)]
    time_scale: Option<f64>,

    /// Output file (or directory with --separate)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Export format (json or csv)
    #[arg(long, default_value = "json")]
    format: ExportFormat,

    /// Export one histogram per file instead of merging
    #[arg(long)]
    separate: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze(args) => cmd_analyze(args),
        Commands::Methods => {
            cmd_methods();
            Ok(())
        }
        Commands::Config { config } => cmd_config(config.as_deref()),
        Commands::Status { config } => cmd_status(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("could not read config {}", path.display())),
        None => Config::load().context("could not read config"),
    }
}

/// Apply command-line overrides on top of the configured settings.
fn resolve_settings(config: &Config, args: &AnalyzeArgs) -> anyhow::Result<ScanSettings> {
    let mut settings = config.analysis;

    if let Some(reset_time) = args.reset_time {
        settings.reset_time = reset_time;
    }
    if let Some(bins) = args.bins {
        settings.num_bins = bins;
    }
    if let Some(bin_width) = args.bin_width {
        settings.num_bins = BinGeometry::from_bin_width(settings.reset_time, bin_width)?.num_bins();
    }
    if let Some(binning) = args.binning {
        settings.binning = binning;
    }

    settings.policy = match (&args.policy, args.delay) {
        (Some(name), delay) => {
            CoincidencePolicy::from_parts(name, delay).map_err(anyhow::Error::msg)?
        }
        (None, Some(delay)) => match settings.policy {
            CoincidencePolicy::CrossChannelNoRepeatDeadtime { .. } => {
                CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay }
            }
            other => bail!("--delay only applies to the dead-time policy, not {other}"),
        },
        (None, None) => settings.policy,
    };

    settings.geometry()?;
    settings.policy.validate()?;
    Ok(settings)
}

fn resolve_load_options(config: &Config, args: &AnalyzeArgs) -> LoadOptions {
    let mut options = config.load_options();
    if let Some(time_scale) = args.time_scale {
        options.time_scale = time_scale;
    }
    options
}

/// A file that was loaded and scanned.
struct FileResult {
    path: PathBuf,
    events: usize,
    count_rate: f64,
    outcome: ScanOutcome,
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let settings = resolve_settings(&config, &args)?;
    let partitions = args.partitions.unwrap_or(config.partitions).max(1);
    let options = resolve_load_options(&config, &args);

    if let Err(e) = config.ensure_directories() {
        tracing::warn!("could not create directories: {e}");
    }

    println!("Rossi-alpha v{VERSION}");
    println!("  Files: {}", args.files.len());
    println!("  Reset time: {} ns", settings.reset_time);
    println!(
        "  Bins: {} ({} ns wide)",
        settings.num_bins,
        settings.reset_time / settings.num_bins as f64
    );
    println!("  Binning: {}", settings.binning);
    if settings.binning.uses_policy() {
        println!("  Policy: {}", settings.policy);
    }
    println!();

    let run_log = create_shared_log_with_persistence(config.run_log_path());

    // Ctrl+C stops dispatching further files; scans already running finish.
    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    let results: Vec<(PathBuf, anyhow::Result<FileResult>)> = args
        .files
        .par_iter()
        .map(|path| {
            if !running.load(Ordering::SeqCst) {
                return (path.clone(), Err(anyhow::anyhow!("interrupted")));
            }
            (path.clone(), process_file(path, &settings, &options, partitions))
        })
        .collect();

    let mut completed = Vec::new();
    for (path, result) in results {
        match result {
            Ok(file) => {
                run_log.record_scan(file.events, &file.outcome.report);
                let report = &file.outcome.report;
                println!(
                    "[{}] {} events ({:.1} counts/s): {} differences, {} empty windows, \
                     {} time jumps, {} out of range",
                    path.display(),
                    file.events,
                    file.count_rate,
                    report.differences,
                    report.empty_windows,
                    report.time_jumps,
                    report.dropped
                );
                completed.push(file);
            }
            Err(e) => {
                run_log.record_failure();
                eprintln!("[{}] skipped: {e:#}", path.display());
            }
        }
    }

    let exported = if completed.is_empty() {
        Err(anyhow::anyhow!("no event file could be analyzed"))
    } else if args.separate {
        export_separate(&completed, &settings, &args, &config, &run_log)
    } else {
        export_merged(completed, &settings, &args, &config, &run_log)
    };

    if let Err(e) = run_log.save() {
        tracing::warn!("could not save run log: {e}");
    }

    exported?;
    println!();
    println!("{}", run_log.summary());
    Ok(())
}

fn process_file(
    path: &Path,
    settings: &ScanSettings,
    options: &LoadOptions,
    partitions: usize,
) -> anyhow::Result<FileResult> {
    let stream = load_events(path, options)
        .with_context(|| format!("could not load {}", path.display()))?;
    let outcome = scan_parallel(&stream, settings, partitions)?;
    let summary = summarize_stream(&stream);
    Ok(FileResult {
        path: path.to_path_buf(),
        events: summary.events,
        count_rate: summary.count_rate_per_s,
        outcome,
    })
}

fn export_merged(
    completed: Vec<FileResult>,
    settings: &ScanSettings,
    args: &AnalyzeArgs,
    config: &Config,
    run_log: &SharedRunLog,
) -> anyhow::Result<()> {
    let sources: Vec<String> = completed
        .iter()
        .map(|f| f.path.display().to_string())
        .collect();
    let merged = merge_outcomes(completed.into_iter().map(|f| f.outcome).collect())?;

    let path = args.output.clone().unwrap_or_else(|| {
        config.export_path.join(format!(
            "rossi_{}.{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            args.format.extension()
        ))
    });

    let export = ExportBuilder::new().build(&merged, settings, &sources);
    export
        .write(&path, args.format)
        .with_context(|| format!("could not write {}", path.display()))?;
    run_log.record_export();

    print_histogram_summary(&merged);
    println!("Exported histogram to {path:?}");
    Ok(())
}

fn export_separate(
    completed: &[FileResult],
    settings: &ScanSettings,
    args: &AnalyzeArgs,
    config: &Config,
    run_log: &SharedRunLog,
) -> anyhow::Result<()> {
    let dir = args.output.clone().unwrap_or_else(|| config.export_path.clone());
    let builder = ExportBuilder::new();

    for file in completed {
        let stem = file
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "events".to_string());
        let path = dir.join(format!("{stem}_rossi.{}", args.format.extension()));

        let export = builder.build(&file.outcome, settings, &[file.path.display().to_string()]);
        export
            .write(&path, args.format)
            .with_context(|| format!("could not write {}", path.display()))?;
        run_log.record_export();
        println!("Exported {:?} to {path:?}", file.path);
    }
    Ok(())
}

fn print_histogram_summary(outcome: &ScanOutcome) {
    let summary = summarize_histogram(&outcome.histogram);
    println!();
    println!("Histogram:");
    println!("  Total counts: {}", summary.total);
    println!(
        "  Peak: bin {} ({:.2} ns)",
        summary.peak_bin, summary.peak_center
    );
    println!(
        "  Mean difference: {:.2} ns (sd {:.2} ns)",
        summary.mean_difference, summary.std_difference
    );
    println!("  Background: {:.2} counts/bin", summary.background);
    println!("  Correlated excess: {:.0} counts", summary.excess);
}

fn cmd_methods() {
    println!("{METHODS_GUIDE}");
}

fn cmd_config(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(path)?;

    println!("Configuration");
    println!("=============");
    println!();
    println!(
        "Config file: {:?}",
        path.map(Path::to_path_buf).unwrap_or_else(Config::config_path)
    );
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_status(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(path)?;

    println!("Rossi-alpha Status");
    println!("==================");
    println!();

    let log_path = config.run_log_path();
    if log_path.exists() {
        let run_log = create_shared_log_with_persistence(log_path);
        println!("{}", run_log.summary());
    } else {
        println!("No previous run data found.");
    }
    Ok(())
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    }) {
        tracing::warn!("could not set Ctrl+C handler: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_args(extra: &[&str]) -> AnalyzeArgs {
        let argv = ["rossi", "analyze", "events.txt"].iter().chain(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Analyze(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_time_scale_from_config() {
        let config = Config {
            time_scale: 1000.0,
            ..Config::default()
        };
        let options = resolve_load_options(&config, &analyze_args(&[]));
        assert_eq!(options, config.load_options());
    }

    #[test]
    fn test_time_scale_override() {
        let config = Config {
            time_scale: 1000.0,
            ..Config::default()
        };
        let options = resolve_load_options(&config, &analyze_args(&["--time-scale", "0.5"]));
        assert_eq!(options.time_scale, 0.5);
    }

    #[test]
    fn test_settings_overrides() {
        let config = Config::default();
        let args = analyze_args(&[
            "--reset-time",
            "200",
            "--bin-width",
            "4",
            "--binning",
            "type-ii",
            "--policy",
            "deadtime",
            "--delay",
            "12",
        ]);
        let settings = resolve_settings(&config, &args).unwrap();

        assert_eq!(settings.reset_time, 200.0);
        assert_eq!(settings.num_bins, 50);
        assert_eq!(settings.binning, BinningType::TypeII);
        assert_eq!(
            settings.policy,
            CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay: 12.0 }
        );
    }

    #[test]
    fn test_delay_without_deadtime_policy_rejected() {
        let args = analyze_args(&["--delay", "5"]);
        assert!(resolve_settings(&Config::default(), &args).is_err());
    }

    #[test]
    fn test_oversized_bin_count_rejected() {
        let args = analyze_args(&["--reset-time", "1000", "--bin-width", "1e-12"]);
        assert!(resolve_settings(&Config::default(), &args).is_err());
    }
}
