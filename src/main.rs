use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod aggregate;
mod classify;
mod config;
mod detect;
mod error;
mod ingest;
mod models;
mod pipeline;
mod report;
mod risk;

use config::DiagnoseConfig;
use models::Incident;

#[derive(Parser)]
#[command(name = "conversion-early-warning")]
#[command(about = "Flags days where ad conversions collapsed and suggests a likely cause", long_about = None)]
struct Cli {
    /// Threshold overrides (TOML); skipped when the file does not exist
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Daily traffic CSV with date, clicks, conversions[, cost][, revenue]
    #[arg(long, default_value = "traffic_drop_data.csv")]
    csv: PathBuf,
    /// Fail on malformed input instead of reporting no incidents
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print incident alerts to stdout
    Diagnose {
        #[command(flatten)]
        input: InputArgs,
        /// Print incidents as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a CSV incident report
    Export {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "incident_report.csv")]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn load_incidents(input: &InputArgs, config: &DiagnoseConfig) -> anyhow::Result<Vec<Incident>> {
    let file = File::open(&input.csv)
        .with_context(|| format!("failed to open {}", input.csv.display()))?;

    if input.strict {
        pipeline::try_diagnose_reader(file, config)
            .with_context(|| format!("malformed input in {}", input.csv.display()))
    } else {
        Ok(pipeline::diagnose_reader(file, config))
    }
}

fn create_output(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DiagnoseConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Diagnose { input, json } => {
            let incidents = load_incidents(&input, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&incidents)?);
            } else {
                print!("{}", report::render_alerts(&incidents));
            }
        }
        Commands::Export { input, out } => {
            let incidents = load_incidents(&input, &config)?;
            report::write_csv(&incidents, create_output(&out)?)?;
            println!("Wrote {} incidents to {}.", incidents.len(), out.display());
        }
        Commands::Report { input, out } => {
            let incidents = load_incidents(&input, &config)?;
            let report = report::build_report(&input.csv.display().to_string(), &incidents);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
