//! The run loop.
//!
//! [`PiEstimator`] wires the pieces together: it seeds the counters from
//! prior runs, starts the worker pool behind a bounded channel and then
//! repeats collect → report → emit until its [`ShutdownSignal`] is raised.
//!
//! ```text
//! PriorRunRecord ──sum/clamp──▶ Aggregator ◀──bounded(u64)── WorkerPool
//!                                   │
//!                                   ▼
//!                            ProgressReport ──▶ ProgressSink
//! ```

use std::time::Instant;

use chrono::Utc;
use crossbeam_channel::bounded;
use num_rational::BigRational;
use tracing::{debug, info, warn};

use crate::aggregator::{Aggregator, Tally};
use crate::config::EstimatorConfig;
use crate::error::EstimatorError;
use crate::ratio::{format_decimal, pi_ratio, REPORT_DIGITS};
use crate::report::ProgressSink;
use crate::seed::{clamp_non_negative, PriorRunRecord};
use crate::shutdown::ShutdownSignal;
use crate::worker::WorkerPool;

/// Outcome of a run that was stopped through its shutdown signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Completed aggregation cycles.
    pub cycles: u64,
    /// Counters after the last cycle.
    pub tally: Tally,
    /// Estimate after the last cycle.
    pub pi: BigRational,
}

/// Parallel Monte Carlo estimator of π.
///
/// # Examples
///
/// ```rust
/// use pi_engine::{EstimatorConfig, PiEstimator, ProgressReport, EstimatorError};
///
/// let config = EstimatorConfig::builder()
///     .sync_every(1_000)
///     .parallelism(2)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let estimator = PiEstimator::from_counts(config, 0, 0);
/// let shutdown = estimator.shutdown_signal();
///
/// let mut reports = 0;
/// let mut sink = |_: &ProgressReport| {
///     reports += 1;
///     if reports == 3 {
///         shutdown.request();
///     }
///     Ok::<(), EstimatorError>(())
/// };
///
/// let summary = estimator.run(&mut sink).unwrap();
/// assert_eq!(summary.cycles, 3);
/// assert_eq!(summary.tally.total, 6_000);
/// ```
pub struct PiEstimator {
    config: EstimatorConfig,
    seed_inside: u64,
    seed_total: u64,
    shutdown: ShutdownSignal,
}

impl PiEstimator {
    /// Creates an estimator resuming from the sum of `prior`.
    pub fn new(config: EstimatorConfig, prior: &PriorRunRecord) -> Self {
        let (inside, total) = prior.sum();
        debug!(runs = prior.len(), inside, total, "Summed prior runs");
        Self::from_counts(config, inside, total)
    }

    /// Creates an estimator resuming from `(inside, total)`.
    ///
    /// Negative values come from malformed configuration and are clamped to
    /// zero.
    pub fn from_counts(config: EstimatorConfig, inside: i64, total: i64) -> Self {
        if inside < 0 || total < 0 {
            warn!(inside, total, "Negative seed counts clamped to zero");
        }
        Self {
            config,
            seed_inside: clamp_non_negative(inside),
            seed_total: clamp_non_negative(total),
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Returns the clamped `(inside, total)` the run starts from.
    pub fn seed_counts(&self) -> (u64, u64) {
        (self.seed_inside, self.seed_total)
    }

    /// Returns the estimate at the starting point.
    pub fn seed_pi(&self) -> BigRational {
        pi_ratio(self.seed_inside, self.seed_total)
    }

    /// Returns a handle that stops [`run`](Self::run) when raised.
    ///
    /// Raising it before the run starts gives a summary with zero cycles.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Runs the sampling loop, emitting one report per cycle into `sink`.
    ///
    /// Without an external shutdown this never returns. The signal is
    /// checked before each cycle starts; a cycle in progress always
    /// completes and is reported.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker cannot be spawned, the batch channel
    /// closes, the sink fails or a worker panics. Workers are stopped and
    /// joined before returning in every case except a failure to spawn.
    pub fn run<S>(self, sink: &mut S) -> Result<RunSummary, EstimatorError>
    where
        S: ProgressSink + ?Sized,
    {
        let config = &self.config;
        info!(
            parallelism = config.parallelism(),
            sync_every = config.sync_every(),
            queue_capacity = config.queue_capacity(),
            seeded = config.seed().is_some(),
            inside = self.seed_inside,
            total = self.seed_total,
            "Starting estimator"
        );

        let (tx, rx) = bounded::<u64>(config.queue_capacity());
        let mut aggregator = Aggregator::new(
            self.seed_inside,
            self.seed_total,
            config.sync_every(),
            config.parallelism(),
            Instant::now(),
        );

        let pool = WorkerPool::spawn(config, &tx)?;
        // Only workers hold senders from here on.
        drop(tx);

        let mut cycles = 0u64;
        let outcome = loop {
            if self.shutdown.is_requested() {
                break Ok(());
            }
            if let Err(err) = aggregator.collect_cycle(&rx) {
                break Err(err);
            }
            cycles += 1;

            let report = aggregator.report(Instant::now(), Utc::now());
            debug!(
                cycle = cycles,
                total = report.total,
                pi = %format_decimal(&report.pi, REPORT_DIGITS),
                "Cycle complete"
            );
            if let Err(err) = sink.emit(&report) {
                break Err(err);
            }
        };

        self.shutdown.request();
        // Hanging up releases every worker, including those parked on a
        // full queue.
        drop(rx);
        let batches = pool.join()?;
        outcome?;

        let tally = aggregator.tally();
        info!(
            cycles,
            batches,
            inside = tally.inside,
            total = tally.total,
            "Estimator stopped"
        );
        Ok(RunSummary {
            cycles,
            tally,
            pi: aggregator.pi(),
        })
    }
}
