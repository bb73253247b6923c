//! Batch driver for bombsight.
//!
//! Turns a directory of recorded match event logs into one labeled CSV
//! dataset per match, and merges per-match datasets into one file.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `bombsight-config.yaml` (defaults if absent)
//! 3. Initialize structured logging (tracing)
//! 4. Run the requested subcommand and log its summary

mod batch;
mod error;
mod output;

use std::path::{Path, PathBuf};

use bombsight_core::config::BombsightConfig;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "bombsight-config.yaml";

#[derive(Parser)]
#[command(name = "bombsight")]
#[command(about = "Label bomb-planted match snapshots with round outcomes", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every recorded match in a directory into per-match CSV files
    Scan {
        /// Directory of recorded event logs
        input: PathBuf,

        /// Directory for the CSV files
        output: PathBuf,
    },

    /// Merge per-match CSV files into one dataset
    Merge {
        /// Directory of per-match CSV files
        input: PathBuf,

        /// Merged CSV file path
        output: PathBuf,
    },
}

/// Application entry point for the batch driver.
///
/// # Errors
///
/// Returns an error if configuration is invalid, an input directory is
/// missing, or an output location cannot be written. Individual match
/// failures during `scan` are logged and counted, not returned.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config);
    info!(
        config = %cli.config.display(),
        interval_seconds = config.sampling.interval_seconds,
        max_concurrent_matches = config.batch.max_concurrent_matches,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Scan { input, output } => {
            let summary =
                batch::run_scan(&input, &output, &config.sampling, &config.batch).await?;
            if summary.failed > 0 {
                warn!(failed = summary.failed, "Some matches failed to scan");
            }
        }
        Commands::Merge { input, output } => {
            let _ = batch::run_merge(&input, &output, &config.batch).await?;
        }
    }

    info!("bombsight shutdown complete");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults if the file
/// does not exist.
fn load_config(path: &Path) -> Result<BombsightConfig, EngineError> {
    if path.exists() {
        Ok(BombsightConfig::from_file(path)?)
    } else {
        // Still applies environment overrides.
        Ok(BombsightConfig::parse("")?)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(config: &BombsightConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
