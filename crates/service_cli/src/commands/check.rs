//! Check command implementation
//!
//! Prints the configuration a run would use after file, environment and
//! flag overrides are applied.

use std::io::Write;
use std::path::Path;

use crate::config::CliConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &CliConfig, config_file: &Path) -> Result<()> {
    write_report(config, config_file, &mut std::io::stdout().lock())
}

fn write_report<W: Write>(config: &CliConfig, config_file: &Path, out: &mut W) -> Result<()> {
    let estimator = config.estimator_config()?;
    let source = if config_file.exists() {
        config_file.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_file.display())
    };
    let seed = estimator
        .seed()
        .map_or_else(|| "entropy".to_string(), |seed| seed.to_string());

    writeln!(out, "config file: {}", source)?;
    writeln!(out, "log level: {}", config.log_level)?;
    writeln!(out, "sync every: {}", estimator.sync_every())?;
    writeln!(out, "parallelism: {}", estimator.parallelism())?;
    writeln!(out, "queue capacity: {}", estimator.queue_capacity())?;
    writeln!(out, "seed: {}", seed)?;
    writeln!(out, "samples per cycle: {}", estimator.cycle_increment())?;
    writeln!(out, "prior runs: {}", config.prior_runs.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_effective_values() {
        let config = CliConfig {
            sync_every: 1_000,
            parallelism: Some(4),
            seed: Some(7),
            ..CliConfig::default()
        };

        let mut out = Vec::new();
        write_report(&config, Path::new("/nonexistent/pi.toml"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("(not found, using defaults)"));
        assert!(text.contains("parallelism: 4\n"));
        assert!(text.contains("seed: 7\n"));
        assert!(text.contains("samples per cycle: 4000\n"));
    }

    #[test]
    fn test_report_rejects_invalid_config() {
        let config = CliConfig {
            queue_capacity: 0,
            ..CliConfig::default()
        };

        let mut out = Vec::new();
        assert!(write_report(&config, Path::new("pi.toml"), &mut out).is_err());
    }
}
