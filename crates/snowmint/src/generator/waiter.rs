use core::{cell::Cell, cmp::Ordering, time::Duration};

#[cfg(feature = "tracing")]
use tracing::warn;

use crate::{Error, Result, SleepProvider, TimeSource};

/// Regressions of this many milliseconds or more fail immediately instead of
/// being waited out.
pub const MAX_RECOVERABLE_REGRESSION_MS: i64 = 5;

/// Reconciles a stalled or backward clock with the need for non-decreasing
/// timestamps.
///
/// The waiter has two strategies:
///
/// - **Regression** (clock behind the last issued timestamp): a small offset
///   (< [`MAX_RECOVERABLE_REGRESSION_MS`]) is slept out once for twice its
///   length, then the clock is re-read. If it is still behind, or the offset
///   was large to begin with, [`Error::ClockRegression`] is returned. A waiter
///   sleeps at most once over its lifetime: any later regression it sees
///   fails immediately. The generator uses one waiter per ID.
/// - **Exhaustion** (clock equal to the last issued timestamp): the clock is
///   busy-polled until it ticks over. The expected wait is well under a
///   millisecond, so spinning trades CPU for latency on purpose.
///
/// # Example
///
/// ```
/// use snowmint::{ClockWaiter, ThreadSleep, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         100
///     }
/// }
///
/// let (time, sleep) = (FixedTime, ThreadSleep);
/// let waiter = ClockWaiter::new(&time, &sleep);
/// assert_eq!(waiter.wait_past(90).unwrap(), 100);
/// assert!(waiter.wait_past(200).unwrap_err().is_clock_regression());
/// ```
#[derive(Debug)]
pub struct ClockWaiter<'a, T, S> {
    time: &'a T,
    sleep: &'a S,
    waited: Cell<bool>,
}

impl<'a, T, S> ClockWaiter<'a, T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    pub const fn new(time: &'a T, sleep: &'a S) -> Self {
        Self {
            time,
            sleep,
            waited: Cell::new(false),
        }
    }

    /// Re-reads the clock and returns a timestamp no earlier than `prev`.
    ///
    /// - Ahead of `prev`: returned as-is.
    /// - Equal to `prev`: spins until the clock passes `prev`.
    /// - Behind `prev`: see the regression strategy on [`ClockWaiter`]. A
    ///   recovered reading may equal `prev`.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock is too far behind, did not
    ///   recover after the bounded wait, or regressed again after this waiter
    ///   already waited once.
    /// - [`Error::Cancelled`] if the sleep provider was interrupted.
    pub fn wait_past(&self, prev: i64) -> Result<i64> {
        let now = self.time.current_millis();
        match now.cmp(&prev) {
            Ordering::Greater => Ok(now),
            Ordering::Equal => self.spin_past(prev),
            Ordering::Less => self.cold_clock_behind(prev, now),
        }
    }

    /// Like [`Self::wait_past`], but only returns a timestamp strictly
    /// greater than `prev`.
    ///
    /// Used when the sequence for `prev` is exhausted: reusing `prev` would
    /// reissue an ID. If a recovered reading lands exactly on `prev`, the
    /// clock is polled again, but the bounded wait is not repeated.
    ///
    /// # Errors
    ///
    /// Same as [`Self::wait_past`].
    pub fn advance_past(&self, prev: i64) -> Result<i64> {
        loop {
            let now = self.wait_past(prev)?;
            if now > prev {
                return Ok(now);
            }
        }
    }

    fn spin_past(&self, prev: i64) -> Result<i64> {
        loop {
            core::hint::spin_loop();
            let now = self.time.current_millis();
            match now.cmp(&prev) {
                Ordering::Greater => return Ok(now),
                Ordering::Equal => {}
                // Never hand back a timestamp older than `prev`
                Ordering::Less => return self.cold_clock_behind(prev, now),
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, prev: i64, now: i64) -> Result<i64> {
        let offset = prev.saturating_sub(now);
        debug_assert!(offset > 0);

        if offset >= MAX_RECOVERABLE_REGRESSION_MS || self.waited.replace(true) {
            return Err(self.regression(now, prev));
        }

        self.sleep
            .sleep_for(Duration::from_millis(offset.unsigned_abs() * 2))?;

        let now = self.time.current_millis();
        if now < prev {
            return Err(self.regression(now, prev));
        }
        Ok(now)
    }

    fn regression(&self, observed: i64, last: i64) -> Error {
        let observed_unix = self.time.to_unix_millis(observed);
        #[cfg(feature = "tracing")]
        warn!(
            observed,
            observed_unix,
            last,
            offset = last.saturating_sub(observed),
            "clock moved backwards"
        );
        Error::ClockRegression {
            observed,
            observed_unix,
            last,
        }
    }
}
