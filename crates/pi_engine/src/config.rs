//! Estimator configuration.
//!
//! This module provides the configuration type and builder for the parallel
//! sampling loop. Every worker and the aggregator share one configuration, so
//! the batch size seen by workers always matches the increment the aggregator
//! applies per cycle.

use crate::error::ConfigError;

/// Default number of samples per worker batch.
pub const DEFAULT_SYNC_EVERY: u64 = 100_000_000;

/// Default capacity of the batch hand-off queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Maximum batch size allowed.
pub const MAX_SYNC_EVERY: u64 = 10_000_000_000;

/// Maximum number of workers allowed.
pub const MAX_PARALLELISM: usize = 4096;

/// Maximum hand-off queue capacity allowed.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;

/// Estimator configuration.
///
/// Immutable once built. Use [`EstimatorConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pi_engine::config::EstimatorConfig;
///
/// let config = EstimatorConfig::builder()
///     .sync_every(1_000_000)
///     .parallelism(4)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.sync_every(), 1_000_000);
/// assert_eq!(config.parallelism(), 4);
/// assert_eq!(config.cycle_increment(), 4_000_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Samples generated by a worker between hand-offs.
    sync_every: u64,
    /// Number of worker threads.
    parallelism: usize,
    /// Capacity of the bounded batch channel.
    queue_capacity: usize,
    /// Optional base seed for reproducible runs.
    seed: Option<u64>,
}

impl EstimatorConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EstimatorConfigBuilder {
        EstimatorConfigBuilder::default()
    }

    /// Returns the batch size.
    #[inline]
    pub fn sync_every(&self) -> u64 {
        self.sync_every
    }

    /// Returns the number of workers.
    #[inline]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Returns the hand-off queue capacity.
    #[inline]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Returns the optional base seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Samples added to `total` by one complete aggregation cycle.
    #[inline]
    pub fn cycle_increment(&self) -> u64 {
        // Bounded by MAX_SYNC_EVERY * MAX_PARALLELISM, well inside u64.
        self.sync_every * self.parallelism as u64
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `sync_every` is 0 or greater than [`MAX_SYNC_EVERY`]
    /// - `parallelism` is 0 or greater than [`MAX_PARALLELISM`]
    /// - `queue_capacity` is 0 or greater than [`MAX_QUEUE_CAPACITY`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_every == 0 || self.sync_every > MAX_SYNC_EVERY {
            return Err(ConfigError::InvalidSyncEvery(self.sync_every));
        }
        if self.parallelism == 0 || self.parallelism > MAX_PARALLELISM {
            return Err(ConfigError::InvalidParallelism(self.parallelism));
        }
        if self.queue_capacity == 0 || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::InvalidQueueCapacity(self.queue_capacity));
        }
        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            sync_every: DEFAULT_SYNC_EVERY,
            parallelism: num_cpus::get().clamp(1, MAX_PARALLELISM),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            seed: None,
        }
    }
}

/// Builder for [`EstimatorConfig`].
///
/// Unset fields fall back to the defaults: a batch of
/// [`DEFAULT_SYNC_EVERY`] samples, one worker per logical CPU and a queue of
/// [`DEFAULT_QUEUE_CAPACITY`] batches.
#[derive(Clone, Debug, Default)]
pub struct EstimatorConfigBuilder {
    sync_every: Option<u64>,
    parallelism: Option<usize>,
    queue_capacity: Option<usize>,
    seed: Option<u64>,
}

impl EstimatorConfigBuilder {
    /// Sets the batch size.
    ///
    /// # Arguments
    ///
    /// * `sync_every` - Samples per batch in [1, 10_000_000_000]
    #[inline]
    pub fn sync_every(mut self, sync_every: u64) -> Self {
        self.sync_every = Some(sync_every);
        self
    }

    /// Sets the number of workers.
    ///
    /// # Arguments
    ///
    /// * `parallelism` - Worker count in [1, 4096]
    #[inline]
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Sets the capacity of the batch hand-off queue.
    #[inline]
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = Some(queue_capacity);
        self
    }

    /// Sets the base seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the base seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any value fails [`EstimatorConfig::validate`].
    pub fn build(self) -> Result<EstimatorConfig, ConfigError> {
        let defaults = EstimatorConfig::default();
        let config = EstimatorConfig {
            sync_every: self.sync_every.unwrap_or(defaults.sync_every),
            parallelism: self.parallelism.unwrap_or(defaults.parallelism),
            queue_capacity: self.queue_capacity.unwrap_or(defaults.queue_capacity),
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}
