//! Per-worker random number generation.
//!
//! Each sample worker owns one [`SampleRng`]. Generators are never shared
//! between threads, so no locking happens on the sampling hot path and two
//! workers never draw from the same stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Increment of the SplitMix64 sequence (the 64-bit golden ratio).
const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derives the seed of worker `worker` from a run-wide base seed.
///
/// Adjacent worker indices map to well-separated seeds via one SplitMix64
/// step.
///
/// # Examples
///
/// ```rust
/// use pi_engine::rng::derive_worker_seed;
///
/// assert_eq!(derive_worker_seed(42, 3), derive_worker_seed(42, 3));
/// assert_ne!(derive_worker_seed(42, 0), derive_worker_seed(42, 1));
/// ```
pub fn derive_worker_seed(base: u64, worker: usize) -> u64 {
    let mut z = base.wrapping_add((worker as u64).wrapping_add(1).wrapping_mul(SPLITMIX_GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Random source for one sample worker.
///
/// # Examples
///
/// ```rust
/// use pi_engine::rng::SampleRng;
///
/// let mut rng = SampleRng::from_seed(42);
/// let (x, y) = rng.gen_point();
/// assert!((0.0..1.0).contains(&x));
/// assert!((0.0..1.0).contains(&y));
/// ```
pub struct SampleRng {
    inner: StdRng,
    /// Seed used for initialisation, `None` when seeded from OS entropy.
    seed: Option<u64>,
}

impl SampleRng {
    /// Creates a generator with a fixed seed.
    ///
    /// The same seed always produces the same sequence of points.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a generator seeded from operating system entropy.
    #[inline]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Creates the generator for worker `worker`.
    ///
    /// With a base seed the result is reproducible; without one each call
    /// draws fresh entropy.
    pub fn for_worker(base_seed: Option<u64>, worker: usize) -> Self {
        match base_seed {
            Some(base) => Self::from_seed(derive_worker_seed(base, worker)),
            None => Self::from_entropy(),
        }
    }

    /// Returns the seed used for initialisation, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generates a uniform value in [0, 1).
    #[inline]
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Generates a point uniformly distributed over the unit square.
    #[inline]
    pub fn gen_point(&mut self) -> (f64, f64) {
        let x = self.gen_unit();
        let y = self.gen_unit();
        (x, y)
    }
}
