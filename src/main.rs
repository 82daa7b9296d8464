//! # Locus Command Line
//!
//! Loads a scenario file, places its locations and prints the result as JSON.
//!
//! Logging goes through the `log` facade with `env_logger` as the backend.

use clap::Parser;
use locus::{create_rng, LocusResult, Scenario};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for the locus placement tool.
#[derive(Parser, Debug)]
#[command(name = "locus")]
#[command(about = "Places world locations onto biome chunks")]
#[command(version)]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Random seed, overrides the scenario's seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of proposal steps, overrides the scenario
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Chunk edge length in cells, overrides the scenario
    #[arg(short, long)]
    chunk_size: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

fn run(args: &Args) -> LocusResult<()> {
    info!("Starting locus v{}", locus::VERSION);

    let mut scenario = Scenario::from_path(&args.scenario)?;
    if let Some(iterations) = args.iterations {
        scenario.iterations = iterations;
    }
    if let Some(chunk_size) = args.chunk_size {
        scenario.chunk_size = chunk_size;
    }

    let seed = args
        .seed
        .or(scenario.seed)
        .unwrap_or(locus::config::DEFAULT_SEED);
    info!("Placing {} locations with seed {}", scenario.locations.len(), seed);

    let mut rng = create_rng(seed);
    let outcome = scenario.run(&mut rng)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{}", output);

    Ok(())
}
