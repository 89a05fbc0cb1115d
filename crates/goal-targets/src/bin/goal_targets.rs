//! goal-targets CLI: analyze camera frames for goal targets.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use goal_targets::detect::{analyze_path, AnalysisReport};
use goal_targets::{logging, GoalTargetsConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "goal-targets")]
#[command(about = "Find, classify and range retro-reflective goal targets in camera frames")]
#[command(version)]
struct Cli {
    /// Log verbosity on stderr.
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment and classify the regions of one image.
    Analyze(AnalyzeArgs),

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// Path to the input image.
    image: PathBuf,

    /// JSON configuration; missing fields fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the analysis report (JSON).
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::DefaultConfig => {
            println!(
                "{}",
                serde_json::to_string_pretty(&GoalTargetsConfig::default())?
            );
            Ok(())
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) -> CliResult<()> {
    logging::init_logging(level.into())?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(level: LogLevel) -> CliResult<()> {
    logging::init_tracing(level.into(), false)?;
    Ok(())
}

fn run_analyze(args: &AnalyzeArgs) -> CliResult<()> {
    let cfg = match &args.config {
        Some(path) => GoalTargetsConfig::load_json(path)?,
        None => GoalTargetsConfig::default(),
    };
    let report = analyze_path(&args.image, &cfg)?;
    print_report(&report);

    if let Some(out) = &args.json {
        report.write_json(out)?;
        log::info!("report written to {}", out.display());
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!(
        "{} ({}x{}): {} regions, {} too small",
        report.image.display(),
        report.width,
        report.height,
        report.analysis.classifications.len(),
        report.analysis.rejected_small
    );
    for c in &report.analysis.classifications {
        println!(
            "region {} is a {} center=({:.3}, {:.3}) area={}",
            c.index, c.class, c.region.centroid.x, c.region.centroid.y, c.region.area
        );
        println!(
            "  rect={:.1} ar_outer={:.1} ar_inner={:.1} x_edge={:.1} y_edge={:.1}",
            c.scores.rectangularity,
            c.scores.aspect_ratio_outer,
            c.scores.aspect_ratio_inner,
            c.scores.x_edge,
            c.scores.y_edge
        );
        if let Some(d) = c.distance_ft {
            println!("  distance={d:.2} ft");
        }
    }
    match &report.best {
        Some(fix) => println!(
            "best: {} at ({:.3}, {:.3})",
            fix.class, fix.centroid.x, fix.centroid.y
        ),
        None => println!("best: none"),
    }
}
