//! Pi Estimator CLI - resumable Monte Carlo estimation of π
//!
//! This is the operational entry point for the `pi_engine` library.
//!
//! # Commands
//!
//! - `pi-estimator run` - Sample until the process is stopped, one line per cycle
//! - `pi-estimator seed` - Show the estimate the configured prior runs resume from
//! - `pi-estimator check` - Print the effective configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate loads configuration, sets up
//! logging and hands control to the engine. Progress lines go to stdout and
//! diagnostics to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

use error::Result;

use config::{build_config, CliArgs, LogLevel};

/// Resumable parallel Monte Carlo π estimator
#[derive(Parser)]
#[command(name = "pi-estimator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "pi_estimator.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PI_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample until stopped, printing the estimate once per cycle
    Run {
        /// Samples each worker draws per batch
        #[arg(long)]
        sync_every: Option<u64>,

        /// Number of worker threads
        #[arg(short = 'j', long)]
        parallelism: Option<usize>,

        /// Capacity of the batch hand-off queue
        #[arg(long)]
        queue_capacity: Option<usize>,

        /// Base seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Ignore prior runs and start from zero
        #[arg(long)]
        fresh: bool,
    },

    /// Show the summed prior runs and the estimate they give
    Seed,

    /// Print the effective configuration
    Check,
}

fn init_tracing(level: LogLevel, verbose: bool) {
    let level = if verbose && level != LogLevel::Trace {
        LogLevel::Debug
    } else {
        level
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut args = CliArgs {
        config_file: cli.config,
        log_level: cli.log_level,
        ..CliArgs::default()
    };
    if let Commands::Run {
        sync_every,
        parallelism,
        queue_capacity,
        seed,
        fresh,
    } = &cli.command
    {
        args.sync_every = *sync_every;
        args.parallelism = *parallelism;
        args.queue_capacity = *queue_capacity;
        args.seed = *seed;
        args.fresh = *fresh;
    }

    let config = build_config(&args)?;
    init_tracing(config.log_level, cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    info!(config_file = %args.config_file.display(), "Configuration loaded");

    match cli.command {
        Commands::Run { .. } => commands::run::run(&config)?,
        Commands::Seed => commands::seed::run(&config)?,
        Commands::Check => commands::check::run(&config, &args.config_file)?,
    }
    Ok(())
}
