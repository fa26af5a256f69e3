use analyzer::{AnalysisBatch, Analyzer, StrategyReporter};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use configuration::Config;
use core_types::{EventSpec, ZoomPreset};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod data;
mod render;

/// The main entry point for the Aftershock event-study tool.
fn main() -> Result<()> {
    // Optional AFTERSHOCK_* overrides and RUST_LOG from a .env file.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Analyze(args) => handle_analyze(&config, args),
        Commands::Zoom(args) => handle_zoom(&config, args),
        Commands::Presets => {
            for preset in ZoomPreset::ALL {
                println!("{:?}: {}", preset, preset);
            }
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Event-study analysis of market sectors around shock events.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse every configured event across all sectors.
    Analyze(AnalyzeArgs),
    /// Re-examine a single event with a narrower window.
    Zoom(ZoomArgs),
    /// List the available zoom presets.
    Presets,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Narrow every event window to a preset.
    #[arg(long, value_enum)]
    zoom: Option<ZoomPreset>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Parser)]
struct ZoomArgs {
    /// The configured event id to re-examine.
    #[arg(long)]
    event: String,

    /// The window size to use.
    #[arg(long, value_enum)]
    preset: ZoomPreset,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_analyze(config: &Config, args: AnalyzeArgs) -> Result<()> {
    let mut specs = config.event_specs()?;
    if let Some(preset) = args.zoom {
        specs = specs.iter().map(|spec| preset.apply(spec)).collect();
    }
    run_and_report(config, &specs, args.format)
}

fn handle_zoom(config: &Config, args: ZoomArgs) -> Result<()> {
    let spec = config
        .event_specs()?
        .into_iter()
        .find(|spec| spec.event_id == args.event)
        .with_context(|| format!("No event with id '{}' is configured", args.event))?;

    run_and_report(config, &[args.preset.apply(&spec)], args.format)
}

/// Loads the price data, runs the batch and prints one report per event.
fn run_and_report(config: &Config, specs: &[EventSpec], format: OutputFormat) -> Result<()> {
    let directory = &config.data.directory;
    let benchmark = data::load_series(directory, &config.benchmark.symbol)
        .context("The benchmark series is required for every event")?;

    let symbols: Vec<String> = config.sectors.iter().map(|s| s.symbol.clone()).collect();
    let (sectors, skipped) = data::load_sectors(directory, &symbols)?;
    for (symbol, error) in &skipped {
        eprintln!("Skipping sector {}: {:#}", symbol, error);
    }
    if sectors.is_empty() {
        anyhow::bail!("None of the configured sectors could be loaded from {}", directory.display());
    }

    let analyzer = Analyzer::new(&config.classifier)?;
    let batch = analyzer.run(specs, &sectors, &benchmark);

    let reporter = StrategyReporter::new().with_display_names(
        config
            .sectors
            .iter()
            .map(|s| (s.symbol.clone(), s.display_name().to_string())),
    );

    match format {
        OutputFormat::Table => print_tables(config, specs, &reporter, &batch),
        OutputFormat::Json => print_json(specs, &reporter, &batch)?,
    }
    Ok(())
}

fn print_tables(config: &Config, specs: &[EventSpec], reporter: &StrategyReporter, batch: &AnalysisBatch) {
    for (spec, report) in specs.iter().zip(reporter.build_all(batch, specs)) {
        let name = config
            .event(&spec.event_id)
            .map_or(spec.event_id.as_str(), |e| e.display_name());
        let title = format!(
            "{} (date of event: {}, window: -{} / +{} days)",
            name,
            spec.event_date,
            spec.pre_window.num_days(),
            spec.post_window.num_days()
        );
        let failures: Vec<_> = batch.failures_for_event(&spec.event_id).collect();
        println!("{}", render::event_report(&title, &report, &failures));
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    reports: Vec<analyzer::StrategyReport>,
    failures: &'a [analyzer::AnalysisFailure],
}

fn print_json(specs: &[EventSpec], reporter: &StrategyReporter, batch: &AnalysisBatch) -> Result<()> {
    let output = JsonOutput {
        reports: reporter.build_all(batch, specs),
        failures: &batch.failures,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
