//! Aggregation cycle state.
//!
//! The [`Aggregator`] owns the authoritative counters and the previous
//! checkpoint. It lives on the control thread only; workers never see it.
//!
//! One cycle:
//!
//! 1. [`Aggregator::collect_cycle`] receives exactly one batch count per
//!    worker (in any arrival order) and folds them in.
//! 2. [`Aggregator::report`] computes π, Δπ and throughput against the
//!    previous checkpoint, then replaces the checkpoint.

use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;
use num_rational::BigRational;

use crate::error::EstimatorError;
use crate::ratio::{abs_delta, pi_ratio, throughput_thousands};
use crate::report::ProgressReport;

/// Running sample counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Points inside, prior runs included.
    pub inside: u64,
    /// Points sampled, prior runs included.
    pub total: u64,
    /// Points inside, this process only.
    pub run_inside: u64,
    /// Points sampled, this process only.
    pub run_total: u64,
}

impl Tally {
    /// Starts from a resumed pair with empty this-run counters.
    pub fn seeded(inside: u64, total: u64) -> Self {
        Self {
            inside,
            total,
            run_inside: 0,
            run_total: 0,
        }
    }

    /// Adds one cycle's in-circle sum and sample increment to both pairs.
    #[inline]
    pub fn absorb(&mut self, inside: u64, samples: u64) {
        self.inside += inside;
        self.run_inside += inside;
        self.total += samples;
        self.run_total += samples;
    }
}

/// Snapshot used to compute the next cycle's delta and throughput.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    /// Estimate at the checkpoint.
    pub pi: BigRational,
    /// Total samples at the checkpoint.
    pub total: u64,
    /// Instant the checkpoint was taken.
    pub at: Instant,
}

/// Counters and checkpoint of the aggregation loop.
#[derive(Debug)]
pub struct Aggregator {
    tally: Tally,
    checkpoint: Checkpoint,
    sync_every: u64,
    parallelism: usize,
}

impl Aggregator {
    /// Creates an aggregator resuming from `(inside, total)` and takes the
    /// initial checkpoint at `now`.
    pub fn new(inside: u64, total: u64, sync_every: u64, parallelism: usize, now: Instant) -> Self {
        Self {
            tally: Tally::seeded(inside, total),
            checkpoint: Checkpoint {
                pi: pi_ratio(inside, total),
                total,
                at: now,
            },
            sync_every,
            parallelism,
        }
    }

    /// Returns the current counters.
    #[inline]
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Returns the current checkpoint.
    #[inline]
    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    /// Returns the current estimate.
    pub fn pi(&self) -> BigRational {
        pi_ratio(self.tally.inside, self.tally.total)
    }

    /// Samples contributed by one complete cycle: `sync_every * parallelism`.
    #[inline]
    pub fn cycle_increment(&self) -> u64 {
        self.sync_every * self.parallelism as u64
    }

    /// Folds one complete cycle whose batch counts sum to `inside_sum`.
    ///
    /// `total` grows by the theoretical cycle size, not by the number of
    /// messages; every worker only ever sends full batches.
    pub fn absorb_cycle(&mut self, inside_sum: u64) {
        let samples = self.cycle_increment();
        self.tally.absorb(inside_sum, samples);
    }

    /// Receives exactly one batch count per worker and folds the cycle.
    ///
    /// Returns the in-circle sum of the cycle.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError::ChannelClosed`] if every sender hung up
    /// before the cycle was complete; the partial cycle is discarded.
    pub fn collect_cycle(&mut self, rx: &Receiver<u64>) -> Result<u64, EstimatorError> {
        let mut inside_sum = 0u64;
        for _ in 0..self.parallelism {
            let part = rx.recv().map_err(|_| EstimatorError::ChannelClosed)?;
            inside_sum += part;
        }
        self.absorb_cycle(inside_sum);
        Ok(inside_sum)
    }

    /// Builds the progress report for the current counters and moves the
    /// checkpoint to `(pi, total, now)`.
    pub fn report(&mut self, now: Instant, timestamp: DateTime<Utc>) -> ProgressReport {
        let pi = self.pi();
        let elapsed = now.saturating_duration_since(self.checkpoint.at);
        let samples = self.tally.total - self.checkpoint.total;

        let report = ProgressReport {
            timestamp,
            delta: abs_delta(&pi, &self.checkpoint.pi),
            pi: pi.clone(),
            inside: self.tally.inside,
            total: self.tally.total,
            run_inside: self.tally.run_inside,
            run_total: self.tally.run_total,
            throughput_k: throughput_thousands(samples, elapsed),
        };

        self.checkpoint = Checkpoint {
            pi,
            total: self.tally.total,
            at: now,
        };
        report
    }
}
