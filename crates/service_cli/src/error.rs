//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias used by every command.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The estimator stopped with an error.
    #[error("Estimator error: {0}")]
    Estimator(#[from] pi_engine::EstimatorError),

    /// Writing command output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
