use std::fs;
use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use harness::{run_all, HarnessConfig, RunSummary, Testbench};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON run configuration; unset keys keep their defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides the stimulus seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Writes VCD waveforms of the clocked testbenches into this directory
    #[arg(long, value_name = "DIR")]
    trace_dir: Option<PathBuf>,

    /// Writes a JSON summary of the run
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Checks the combinational block generator
    Blockgen,
    /// Checks the multi-cycle compression engine
    Compress,
    /// Checks the pipelined round core
    RoundCore,
    /// Checks the reference models against known vectors
    SelfCheck,
    /// Runs every testbench
    All,
}

impl Command {
    fn testbenches(self) -> Vec<Testbench> {
        match self {
            Command::Blockgen => vec![Testbench::Blockgen],
            Command::Compress => vec![Testbench::Compress],
            Command::RoundCore => vec![Testbench::RoundCore],
            Command::SelfCheck => vec![Testbench::SelfCheck],
            Command::All => Testbench::iter().collect(),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(_) => println!("PASS"),
        Err(err) => {
            tracing::error!("{err:#}");
            exit(1);
        }
    }
}

fn execute(cli: &Cli) -> Result<RunSummary> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::from_json_file(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(dir) = &cli.trace_dir {
        config.trace_dir = Some(dir.clone());
    }
    tracing::info!(seed = config.seed, "starting run");

    let summary = run_all(cli.command.testbenches(), &config)?;

    if let Some(path) = &cli.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    }
    Ok(summary)
}
