/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowmint` can emit.
///
/// Construction fails only with [`Error::Config`]. ID generation fails with
/// [`Error::ClockRegression`], [`Error::Cancelled`] or
/// [`Error::TimestampOverflow`]. In every runtime failure case the generator
/// state is left untouched, so the caller may retry later.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The layout or worker ID was rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The clock moved backward and did not recover within the single
    /// bounded wait, or moved back too far to wait at all.
    ///
    /// `observed` and `last` are milliseconds relative to the generator's
    /// epoch; `observed_unix` is the same reading as Unix milliseconds.
    #[error(
        "clock moved backwards: observed {observed}ms (unix {observed_unix}ms), last issued {last}ms"
    )]
    ClockRegression {
        /// The offending clock reading.
        observed: i64,
        /// The offending clock reading in milliseconds since 1970-01-01 UTC.
        observed_unix: i64,
        /// The timestamp of the last issued ID.
        last: i64,
    },

    /// The bounded wait for a regressed clock was interrupted.
    #[error("wait for clock recovery was cancelled")]
    Cancelled,

    /// The timestamp no longer fits the layout's timestamp field.
    #[error("timestamp {timestamp}ms exceeds the layout maximum of {max}ms")]
    TimestampOverflow {
        /// The resolved timestamp.
        timestamp: u64,
        /// The largest timestamp the layout can hold.
        max: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` for configuration errors raised at construction.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns `true` if the clock moved backwards.
    pub const fn is_clock_regression(&self) -> bool {
        matches!(self, Self::ClockRegression { .. })
    }

    /// Returns `true` if a bounded wait was cancelled.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// How far behind the last issued timestamp the clock was, in
    /// milliseconds. Zero for every other variant.
    pub const fn offset(&self) -> i64 {
        match self {
            Self::ClockRegression { observed, last, .. } => last.saturating_sub(*observed),
            _ => 0,
        }
    }
}

/// Rejected generator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `sequence_bits + worker_bits` exceeds [`MAX_LAYOUT_BITS`].
    ///
    /// [`MAX_LAYOUT_BITS`]: crate::MAX_LAYOUT_BITS
    #[error(
        "sequence bits ({sequence_bits}) plus worker bits ({worker_bits}) cannot be greater than {}",
        crate::MAX_LAYOUT_BITS
    )]
    LayoutTooWide {
        /// Requested sequence width.
        sequence_bits: u8,
        /// Requested worker width.
        worker_bits: u8,
    },

    /// The worker ID does not fit the worker field.
    #[error("worker id {worker_id} cannot be greater than {max}")]
    WorkerIdOutOfRange {
        /// Requested worker ID.
        worker_id: u64,
        /// Largest worker ID the layout can hold.
        max: u64,
    },
}

#[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
