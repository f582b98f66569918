//! Prior run records and the startup seed they produce.
//!
//! A long computation is resumed across process restarts by summing the
//! `(in, total)` pairs of earlier runs into the initial running pair.
//!
//! # Disjoint runs only
//!
//! Every record must describe ONE earlier run on its own: copy the
//! `in/total (this run)` pair from the last progress line of that run, never
//! the `in/total (sum)` pair. The sum already contains all earlier records,
//! so appending it would count that history twice. Nothing here can detect
//! such a mistake because runs carry no identity.

use serde::{Deserialize, Serialize};

/// One earlier run's accumulated counts.
///
/// Values are signed so that malformed configuration can be represented;
/// the estimator clamps negative sums at its entry point.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorRun {
    /// Points that fell inside the quarter-circle.
    pub inside: i64,
    /// Points sampled.
    pub total: i64,
    /// Free-form provenance, e.g. the date and machine of the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PriorRun {
    /// Creates a record without a note.
    pub fn new(inside: i64, total: i64) -> Self {
        Self {
            inside,
            total,
            note: None,
        }
    }

    /// Attaches a provenance note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Ordered list of disjoint earlier runs.
///
/// Deserialises from a TOML table array:
///
/// ```toml
/// [[prior_runs]]
/// inside = 4398286571
/// total = 5600000000
/// note = "2024-03-31 parallel run"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorRunRecord {
    runs: Vec<PriorRun>,
}

impl PriorRunRecord {
    /// Creates a record from runs in recording order.
    pub fn new(runs: Vec<PriorRun>) -> Self {
        Self { runs }
    }

    /// Creates an empty record (a fresh computation).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the recorded runs.
    pub fn runs(&self) -> &[PriorRun] {
        &self.runs
    }

    /// Number of recorded runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns `true` if no run has been recorded.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Sums the record, see [`sum_prior_runs`].
    pub fn sum(&self) -> (i64, i64) {
        sum_prior_runs(&self.runs)
    }
}

impl From<Vec<PriorRun>> for PriorRunRecord {
    fn from(runs: Vec<PriorRun>) -> Self {
        Self::new(runs)
    }
}

/// Sums all `inside` values and all `total` values.
///
/// Entries are not validated. Sums saturate at the `i64` bounds.
///
/// # Examples
///
/// ```rust
/// use pi_engine::seed::{sum_prior_runs, PriorRun};
///
/// assert_eq!(sum_prior_runs(&[]), (0, 0));
/// assert_eq!(
///     sum_prior_runs(&[PriorRun::new(2, 4), PriorRun::new(1, 4)]),
///     (3, 8)
/// );
/// ```
pub fn sum_prior_runs(runs: &[PriorRun]) -> (i64, i64) {
    runs.iter().fold((0i64, 0i64), |(inside, total), run| {
        (
            inside.saturating_add(run.inside),
            total.saturating_add(run.total),
        )
    })
}

/// Clamps a possibly negative count to zero.
#[inline]
pub fn clamp_non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
