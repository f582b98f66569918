//! Run command implementation
//!
//! Starts the worker pool and streams one progress line per cycle to stdout.
//! The command only returns on error; stop the process to end a run, then
//! record the last `in/total (this run)` pair under `prior_runs`.

use pi_engine::{PiEstimator, WriterSink};
use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Run the estimator
pub fn run(config: &CliConfig) -> Result<()> {
    let estimator_config = config.estimator_config()?;

    info!("Starting estimator...");
    info!("  Workers: {}", estimator_config.parallelism());
    info!("  Samples per batch: {}", estimator_config.sync_every());
    info!("  Prior runs: {}", config.prior_runs.len());

    let estimator = PiEstimator::new(estimator_config, &config.prior_runs);
    let summary = estimator.run(&mut WriterSink::stdout())?;

    info!(cycles = summary.cycles, total = summary.tally.total, "Run complete");
    Ok(())
}
