//! CLI configuration management
//!
//! Handles loading configuration from TOML files, environment variables and
//! command-line flags. Priority (highest to lowest):
//!
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file
//! 4. Default values

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use pi_engine::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SYNC_EVERY};
use pi_engine::{EstimatorConfig, PriorRunRecord};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error(transparent)]
    Estimator(#[from] pi_engine::ConfigError),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Estimator configuration as read from `pi_estimator.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Samples per worker batch
    pub sync_every: u64,
    /// Worker count; one per logical CPU when unset
    pub parallelism: Option<usize>,
    /// Capacity of the batch hand-off queue
    pub queue_capacity: usize,
    /// Base seed for reproducible runs
    pub seed: Option<u64>,
    /// Disjoint earlier runs to resume from
    pub prior_runs: PriorRunRecord,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            sync_every: DEFAULT_SYNC_EVERY,
            parallelism: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            seed: None,
            prior_runs: PriorRunRecord::empty(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from environment variables
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("PI_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(value) = lookup("PI_SYNC_EVERY") {
            self.sync_every = parse_value("PI_SYNC_EVERY", &value)?;
        }
        if let Some(value) = lookup("PI_PARALLELISM") {
            self.parallelism = Some(parse_value("PI_PARALLELISM", &value)?);
        }
        if let Some(value) = lookup("PI_QUEUE_CAPACITY") {
            self.queue_capacity = parse_value("PI_QUEUE_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("PI_SEED") {
            self.seed = Some(parse_value("PI_SEED", &value)?);
        }
        Ok(self)
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if let Some(sync_every) = cli.sync_every {
            self.sync_every = sync_every;
        }
        if let Some(parallelism) = cli.parallelism {
            self.parallelism = Some(parallelism);
        }
        if let Some(queue_capacity) = cli.queue_capacity {
            self.queue_capacity = queue_capacity;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if cli.fresh {
            self.prior_runs = PriorRunRecord::empty();
        }
        Ok(())
    }

    /// Build and validate the engine configuration
    pub fn estimator_config(&self) -> Result<EstimatorConfig, ConfigError> {
        let mut builder = EstimatorConfig::builder()
            .sync_every(self.sync_every)
            .queue_capacity(self.queue_capacity)
            .maybe_seed(self.seed);
        if let Some(parallelism) = self.parallelism {
            builder = builder.parallelism(parallelism);
        }
        Ok(builder.build()?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimator_config().map(|_| ())
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: PathBuf,
    /// Log level override
    pub log_level: Option<String>,
    /// Batch size override
    pub sync_every: Option<u64>,
    /// Worker count override
    pub parallelism: Option<usize>,
    /// Queue capacity override
    pub queue_capacity: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Ignore configured prior runs
    pub fresh: bool,
}

/// Build configuration from all sources
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let mut config = CliConfig::from_file_or_default(&cli.config_file)?.with_env_override()?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}
