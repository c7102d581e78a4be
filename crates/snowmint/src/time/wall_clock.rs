use core::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

use crate::{DEFAULT_EPOCH, TimeSource};

/// A time source backed by the system wall clock, offset from a fixed epoch.
///
/// Unlike a monotonic timer, this clock follows every adjustment made to the
/// system time (NTP steps, VM migrations, manual changes), including
/// backward ones. The generator detects those and handles them itself.
///
/// # Example
///
/// ```
/// use snowmint::{DEFAULT_EPOCH, TimeSource, WallClock};
///
/// let clock = WallClock::with_epoch(DEFAULT_EPOCH);
/// assert!(clock.current_millis() > 0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WallClock {
    epoch_millis: i64,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using `epoch` as the origin (t = 0), given as a
    /// [`Duration`] since 1970-01-01 UTC.
    ///
    /// Epochs beyond `i64::MAX` milliseconds saturate.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: saturating_millis(epoch),
        }
    }

    /// The configured epoch in milliseconds since the Unix epoch.
    pub const fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> i64 {
        let unix_millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => saturating_millis(since),
            // System clock set before 1970
            Err(e) => -saturating_millis(e.duration()),
        };
        unix_millis.saturating_sub(self.epoch_millis)
    }

    fn to_unix_millis(&self, millis: i64) -> i64 {
        self.epoch_millis.saturating_add(millis)
    }
}

fn saturating_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_epoch_is_2023_01_25() {
        assert_eq!(WallClock::default().epoch_millis(), 1_674_635_252_000);
    }

    #[test]
    fn reads_relative_to_epoch() {
        let unix = WallClock::with_epoch(Duration::ZERO);
        let custom = WallClock::default();
        let a = custom.current_millis();
        let b = unix.current_millis();
        let diff = b - a - custom.epoch_millis();
        assert!((0..1000).contains(&diff), "diff was {diff}");
        assert_eq!(custom.to_unix_millis(a), a + 1_674_635_252_000);
    }

    #[test]
    fn epoch_in_the_future_reads_negative() {
        let clock = WallClock::with_epoch(Duration::from_millis(i64::MAX as u64));
        assert!(clock.current_millis() < 0);
    }

    #[test]
    fn unix_conversion_follows_custom_epoch() {
        let clock = WallClock::with_epoch(Duration::from_millis(1_000));
        assert_eq!(clock.to_unix_millis(-1_500), -500);
        assert_eq!(WallClock::default().to_unix_millis(0), 1_674_635_252_000);
    }
}
