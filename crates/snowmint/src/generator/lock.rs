use core::{cmp::Ordering, fmt};

#[cfg(feature = "tracing")]
use tracing::{instrument, trace};

use crate::{
    CancelHandle, CancellableSleep, ClockWaiter, Error, Layout, Result, SleepProvider,
    ThreadSleep, TimeSource, WallClock,
    mutex::{Mutex, MutexGuard},
};

/// A lock-based Snowflake ID generator for one worker.
///
/// The only mutable state is the last issued ID, held in a mutex. Every
/// call to [`Self::next_id`] decodes it, decides the next timestamp and
/// sequence, and stores the result, all while holding the lock. IDs are
/// therefore strictly increasing in lock-acquisition order.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Runtime-configurable field widths
/// - ✅ Detects backward clock movement
///
/// # Example
///
/// ```
/// use snowmint::IdGenerator;
///
/// let generator = IdGenerator::new(1).unwrap();
///
/// let a = generator.next_id().unwrap();
/// let b = generator.next_id().unwrap();
/// assert!(a < b);
/// assert_eq!(generator.layout().worker_id(b), 1);
/// ```
pub struct IdGenerator<T = WallClock, S = ThreadSleep> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<u64>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<u64>,
    layout: Layout,
    worker_id: u64,
    pub(crate) time: T,
    pub(crate) sleep: S,
}

impl IdGenerator {
    /// Creates a generator with the default [`Layout`] (12 sequence bits, 10
    /// worker bits), the system [`WallClock`] at [`DEFAULT_EPOCH`] and
    /// [`ThreadSleep`].
    ///
    /// The bounded wait on a small clock regression (at most 8 ms) cannot be
    /// interrupted with [`ThreadSleep`]. Use [`IdGenerator::cancellable`] when
    /// callers need to abort it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `worker_id` is greater than 1023.
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn new(worker_id: u64) -> Result<Self> {
        Self::with_parts(Layout::default(), worker_id, WallClock::default(), ThreadSleep)
    }

    /// Creates a generator with explicit field widths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `sequence_bits + worker_bits` exceeds 28 or
    /// `worker_id` does not fit in `worker_bits`.
    pub fn with_layout(sequence_bits: u8, worker_bits: u8, worker_id: u64) -> Result<Self> {
        let layout = Layout::new(sequence_bits, worker_bits)?;
        Self::with_parts(layout, worker_id, WallClock::default(), ThreadSleep)
    }
}

impl IdGenerator<WallClock, CancellableSleep> {
    /// Like [`IdGenerator::new`], but the bounded wait can be interrupted
    /// through the returned [`CancelHandle`]. An interrupted wait makes
    /// [`Self::next_id`] fail with [`Error::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `worker_id` is greater than 1023.
    pub fn cancellable(worker_id: u64) -> Result<(Self, CancelHandle)> {
        let sleep = CancellableSleep::new();
        let handle = sleep.handle();
        let generator = Self::with_parts(Layout::default(), worker_id, WallClock::default(), sleep)?;
        Ok((generator, handle))
    }
}

impl<T, S> IdGenerator<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    /// Creates a generator with an explicit layout, time source and sleep
    /// provider.
    ///
    /// The initial state encodes timestamp 0 and sequence 0. That value only
    /// seeds the first comparison and is never returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `worker_id` does not fit the layout.
    pub fn with_parts(layout: Layout, worker_id: u64, time: T, sleep: S) -> Result<Self> {
        Self::from_components(layout, 0, worker_id, 0, time, sleep)
    }

    /// Creates a generator whose last issued ID is built from explicit
    /// component values.
    ///
    /// This is primarily useful for tests and for controlling the starting
    /// point of the generator manually. The next ID is guaranteed to be
    /// greater than the seeded one. `sequence` is truncated to the layout's
    /// sequence width.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `worker_id` does not fit the layout.
    /// - [`Error::TimestampOverflow`] if `timestamp` does not fit the layout.
    pub fn from_components(
        layout: Layout,
        timestamp: u64,
        worker_id: u64,
        sequence: u64,
        time: T,
        sleep: S,
    ) -> Result<Self> {
        let worker_id = layout.check_worker_id(worker_id)?;
        if timestamp > layout.max_timestamp() {
            return Err(Error::TimestampOverflow {
                timestamp,
                max: layout.max_timestamp(),
            });
        }

        let id = layout.compose(timestamp, worker_id, sequence);
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(id)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(id),
            layout,
            worker_id,
            time,
            sleep,
        })
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    pub const fn time_source(&self) -> &T {
        &self.time
    }

    /// Returns the most recently issued ID (or the seed, before the first
    /// call to [`Self::next_id`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the lock was poisoned (only without
    /// the `parking-lot` feature).
    pub fn last_id(&self) -> Result<u64> {
        Ok(*self.lock()?)
    }

    /// Generates the next ID.
    ///
    /// - Clock ahead of the last timestamp: sequence resets to zero.
    /// - Same millisecond: sequence increments. If it is already at
    ///   [`Layout::max_sequence`], spins until the next millisecond and
    ///   resets to zero.
    /// - Clock behind (or before the epoch): defers to [`ClockWaiter`], which
    ///   may sleep once for a small regression or fail.
    ///
    /// Blocks only in the last two cases. On error the generator state is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock moved backwards and did not
    ///   recover.
    /// - [`Error::Cancelled`] if the sleep provider was interrupted.
    /// - [`Error::TimestampOverflow`] if the clock is past the largest
    ///   timestamp the layout can hold.
    /// - [`Error::LockPoisoned`] if the lock was poisoned (only without the
    ///   `parking-lot` feature).
    ///
    /// # Example
    ///
    /// ```
    /// use snowmint::{IdGenerator, Layout, ThreadSleep, TimeSource};
    ///
    /// struct FixedTime;
    /// impl TimeSource for FixedTime {
    ///     fn current_millis(&self) -> i64 {
    ///         42
    ///     }
    /// }
    ///
    /// let generator = IdGenerator::with_parts(Layout::default(), 7, FixedTime, ThreadSleep).unwrap();
    /// let id = generator.next_id().unwrap();
    ///
    /// let parts = generator.layout().decode(id);
    /// assert_eq!(parts.timestamp, 42);
    /// assert_eq!(parts.worker_id, 7);
    /// assert_eq!(parts.sequence, 0);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(worker_id = self.worker_id)))]
    pub fn next_id(&self) -> Result<u64> {
        let mut last = self.lock()?;
        let waiter = ClockWaiter::new(&self.time, &self.sleep);

        // Never exceeds 63 bits, so the cast is lossless
        let prev_ts = self.layout.timestamp(*last) as i64;
        let prev_seq = self.layout.sequence(*last);

        let mut now = self.time.current_millis();
        if now < prev_ts || now < 0 {
            now = waiter.wait_past(prev_ts)?;
        }
        debug_assert!(now >= prev_ts);

        let (ts, seq) = match now.cmp(&prev_ts) {
            Ordering::Equal if prev_seq < self.layout.max_sequence() => (now, prev_seq + 1),
            Ordering::Equal => {
                #[cfg(feature = "tracing")]
                trace!(timestamp = prev_ts, "sequence exhausted");
                (waiter.advance_past(prev_ts)?, 0)
            }
            _ => (now, 0),
        };

        let ts = ts as u64;
        let max = self.layout.max_timestamp();
        if ts > max {
            return Err(Error::TimestampOverflow { timestamp: ts, max });
        }

        let id = self.layout.compose(ts, self.worker_id, seq);
        *last = id;
        Ok(id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, u64>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T, S> fmt::Debug for IdGenerator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("layout", &self.layout)
            .field("worker_id", &self.worker_id)
            .finish_non_exhaustive()
    }
}
