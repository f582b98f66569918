//! # Pi Engine
//!
//! Resumable, parallel Monte Carlo estimation of π.
//!
//! Points are drawn uniformly from the unit square; the share that lands
//! inside the inscribed quarter-circle approaches π/4. A fixed pool of
//! worker threads samples at full speed and hands per-batch counts to a
//! single aggregator, which keeps the authoritative totals and reports the
//! estimate once per cycle as an exact rational.
//!
//! ## Architecture
//!
//! ```text
//! PiEstimator
//! ├── EstimatorConfig   (batch size, workers, queue capacity, seed)
//! ├── PriorRunRecord    (earlier runs, summed at startup)
//! ├── WorkerPool        (one SampleWorker + SampleRng per thread)
//! ├── Aggregator        (Tally + Checkpoint, exactly N batches per cycle)
//! └── ProgressSink      (receives one ProgressReport per cycle)
//! ```
//!
//! ## Resuming a computation
//!
//! Record the `in/total (this run)` pair of the last progress line as a new
//! [`PriorRun`] before restarting. Records must describe disjoint runs; see
//! [`seed`] for why the `(sum)` pair must never be recorded.
//!
//! ## Usage Example
//!
//! ```rust
//! use pi_engine::{EstimatorConfig, PiEstimator, PriorRun, PriorRunRecord};
//!
//! let config = EstimatorConfig::builder()
//!     .sync_every(10_000)
//!     .parallelism(2)
//!     .build()
//!     .unwrap();
//!
//! let prior = PriorRunRecord::new(vec![PriorRun::new(785, 1000)]);
//! let estimator = PiEstimator::new(config, &prior);
//! assert_eq!(estimator.seed_counts(), (785, 1000));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod aggregator;
pub mod config;
pub mod error;
pub mod estimator;
pub mod ratio;
pub mod report;
pub mod rng;
pub mod seed;
pub mod shutdown;
pub mod worker;

pub use aggregator::{Aggregator, Checkpoint, Tally};
pub use config::{EstimatorConfig, EstimatorConfigBuilder};
pub use error::{ConfigError, EstimatorError};
pub use estimator::{PiEstimator, RunSummary};
pub use report::{ProgressReport, ProgressSink, WriterSink};
pub use seed::{PriorRun, PriorRunRecord};
pub use shutdown::ShutdownSignal;
