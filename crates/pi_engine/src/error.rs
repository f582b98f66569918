//! Error types for the estimator engine.
//!
//! Configuration errors are raised while building an
//! [`EstimatorConfig`](crate::config::EstimatorConfig); estimator errors are
//! raised by the run loop when a resource it depends on goes away.

use thiserror::Error;

/// Configuration error for the estimator.
///
/// These errors occur at build time when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Batch size outside the valid range.
    #[error("Invalid sync_every {0}: must be in range [1, 10_000_000_000]")]
    InvalidSyncEvery(u64),

    /// Worker count outside the valid range.
    #[error("Invalid parallelism {0}: must be in range [1, 4096]")]
    InvalidParallelism(usize),

    /// Hand-off queue capacity outside the valid range.
    #[error("Invalid queue capacity {0}: must be in range [1, 1_048_576]")]
    InvalidQueueCapacity(usize),
}

/// Runtime error raised by the estimator loop.
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operating system refused to start a worker thread.
    #[error("Failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        /// Index of the worker that could not be started.
        worker: usize,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked.
    ///
    /// Only observed when the pool is joined after the run loop stops; until
    /// then cycles are filled by the remaining workers.
    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),

    /// Every worker hung up before a cycle was complete.
    #[error("Batch channel closed before the cycle was complete")]
    ChannelClosed,

    /// The progress sink failed to write a report.
    #[error("Progress sink error: {0}")]
    Sink(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidSyncEvery(0);
        assert!(err.to_string().contains("Invalid sync_every 0"));

        let err = ConfigError::InvalidParallelism(5000);
        assert!(err.to_string().contains("Invalid parallelism 5000"));

        let err = ConfigError::InvalidQueueCapacity(0);
        assert!(err.to_string().contains("queue capacity 0"));
    }

    #[test]
    fn test_estimator_error_from_config() {
        let err: EstimatorError = ConfigError::InvalidQueueCapacity(0).into();
        assert!(matches!(err, EstimatorError::Config(_)));
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_worker_spawn_display() {
        let err = EstimatorError::WorkerSpawn {
            worker: 3,
            source: std::io::Error::new(std::io::ErrorKind::Other, "no threads left"),
        };
        let text = err.to_string();
        assert!(text.contains("worker 3"));
        assert!(text.contains("no threads left"));
    }
}
