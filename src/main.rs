//! ReviewLens - synthetic restaurant review analyzer
//!
//! Generates a reproducible table of restaurant reviews, averages the
//! ratings per aspect, correlates per-aspect statistics and renders a
//! bar chart and a heatmap as PNG files.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (invalid arguments, config, rendering, I/O)

mod analysis;
mod cli;
mod config;
mod generator;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("ReviewLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Run failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .reviewlens.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml()?;
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout only carries the confirmation lines.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load config, run the pipeline and write the optional summary.
fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    let stdout = std::io::stdout();
    let output = pipeline::run(&config, &mut stdout.lock())?;

    if let Some(ref path) = args.summary {
        pipeline::write_summary(&output, path, args.format)?;
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
