//! Seed command implementation
//!
//! Prints what a run would resume from without starting any workers.

use std::io::Write;

use pi_engine::ratio::{format_decimal, REPORT_DIGITS};
use pi_engine::PiEstimator;

use crate::config::CliConfig;
use crate::Result;

/// Run the seed command
pub fn run(config: &CliConfig) -> Result<()> {
    write_summary(config, &mut std::io::stdout().lock())
}

fn write_summary<W: Write>(config: &CliConfig, out: &mut W) -> Result<()> {
    let (inside, total) = config.prior_runs.sum();
    let estimator = PiEstimator::from_counts(config.estimator_config()?, inside, total);
    let (inside, total) = estimator.seed_counts();

    writeln!(out, "prior runs: {}", config.prior_runs.len())?;
    writeln!(out, "in/total (sum): {}/{}", inside, total)?;
    writeln!(
        out,
        "pi: {}",
        format_decimal(&estimator.seed_pi(), REPORT_DIGITS)
    )?;
    Ok(())
}
