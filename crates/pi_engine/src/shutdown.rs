//! External shutdown hook for the run loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag observed by the run loop between cycles.
///
/// Cloning yields another handle to the same flag. Once raised it stays
/// raised; each [`PiEstimator`](crate::PiEstimator) owns a fresh one and is
/// consumed by its run.
///
/// # Examples
///
/// ```rust
/// use pi_engine::ShutdownSignal;
///
/// let signal = ShutdownSignal::new();
/// let handle = signal.clone();
/// assert!(!signal.is_requested());
///
/// handle.request();
/// assert!(signal.is_requested());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Creates a signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal.
    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            tracing::info!("Shutdown requested");
        }
    }

    /// Returns `true` once the signal has been raised.
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }
}
