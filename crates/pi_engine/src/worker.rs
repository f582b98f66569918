//! Sample workers and the pool that runs them.
//!
//! A worker owns its random source and a batch size. It samples a full batch,
//! hands the batch's in-circle count to the aggregator over a bounded channel
//! and starts the next batch. When the channel is full the send blocks, which
//! throttles workers to the rate at which the aggregator consumes batches.
//!
//! # Lifecycle
//!
//! ```text
//! loop {
//!     sample_batch()          // CPU bound, never suspends
//!     tx.send(count)          // blocks while the queue is full
//!     stop if the aggregator hung up
//! }
//! ```
//!
//! Workers never read the shutdown flag. They stop only when the aggregator
//! hangs up, so every cycle the aggregator starts receives all its batches.

use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use crate::config::EstimatorConfig;
use crate::error::EstimatorError;
use crate::rng::SampleRng;

/// Returns `true` if `(x, y)` lies inside the quarter-circle of radius one.
#[inline(always)]
pub fn in_quarter_circle(x: f64, y: f64) -> bool {
    x * x + y * y <= 1.0
}

/// One independent unit of sampling work.
pub struct SampleWorker {
    id: usize,
    sync_every: u64,
    rng: SampleRng,
}

impl SampleWorker {
    /// Creates a worker with its own random source.
    pub fn new(id: usize, sync_every: u64, rng: SampleRng) -> Self {
        Self {
            id,
            sync_every,
            rng,
        }
    }

    /// Returns the worker index.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the batch size.
    #[inline]
    pub fn sync_every(&self) -> u64 {
        self.sync_every
    }

    /// Samples one full batch and returns the number of points inside the
    /// quarter-circle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pi_engine::rng::SampleRng;
    /// use pi_engine::worker::SampleWorker;
    ///
    /// let mut worker = SampleWorker::new(0, 10_000, SampleRng::from_seed(1));
    /// let inside = worker.sample_batch();
    /// assert!(inside <= 10_000);
    /// ```
    pub fn sample_batch(&mut self) -> u64 {
        let mut inside = 0u64;
        for _ in 0..self.sync_every {
            let (x, y) = self.rng.gen_point();
            if in_quarter_circle(x, y) {
                inside += 1;
            }
        }
        inside
    }

    /// Runs batches until the receiver is dropped.
    ///
    /// Only complete batches are ever sent. Returns the number of batches
    /// delivered.
    pub fn run(mut self, tx: Sender<u64>) -> u64 {
        let mut delivered = 0u64;
        loop {
            let inside = self.sample_batch();
            if tx.send(inside).is_err() {
                trace!(worker = self.id, "Batch receiver dropped");
                break;
            }
            delivered += 1;
        }
        debug!(worker = self.id, batches = delivered, "Worker stopped");
        delivered
    }
}

/// Handles to the running worker threads.
pub struct WorkerPool {
    handles: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// Starts `config.parallelism()` workers sending into `tx`.
    ///
    /// Each worker gets its own generator, derived from the configured seed
    /// when there is one.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError::WorkerSpawn`] if a thread cannot be started.
    /// Workers started before the failure stop once the receiving end of the
    /// channel is dropped.
    pub fn spawn(config: &EstimatorConfig, tx: &Sender<u64>) -> Result<Self, EstimatorError> {
        let mut handles = Vec::with_capacity(config.parallelism());

        for id in 0..config.parallelism() {
            let worker = SampleWorker::new(
                id,
                config.sync_every(),
                SampleRng::for_worker(config.seed(), id),
            );
            let tx = tx.clone();

            let handle = thread::Builder::new()
                .name(format!("pi-worker-{id}"))
                .spawn(move || worker.run(tx))
                .map_err(|source| EstimatorError::WorkerSpawn { worker: id, source })?;
            handles.push(handle);
        }

        debug!(workers = handles.len(), "Worker pool started");
        Ok(Self { handles })
    }

    /// Number of workers in the pool.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the pool has no workers.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every worker to exit and returns the total number of
    /// batches they delivered.
    ///
    /// The caller must have dropped the receiver first, otherwise this blocks
    /// forever.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError::WorkerPanicked`] for the first worker that
    /// panicked; the remaining workers are still joined. Panics only surface
    /// here, so a run keeps filling cycles from the surviving workers until
    /// it is stopped.
    pub fn join(self) -> Result<u64, EstimatorError> {
        let mut delivered = 0u64;
        let mut first_panic = None;

        for (id, handle) in self.handles.into_iter().enumerate() {
            match handle.join() {
                Ok(batches) => delivered += batches,
                Err(_) => {
                    first_panic.get_or_insert(id);
                }
            }
        }

        match first_panic {
            Some(id) => Err(EstimatorError::WorkerPanicked(id)),
            None => Ok(delivered),
        }
    }
}
