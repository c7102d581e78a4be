use core::time::Duration;

/// Default epoch: Wednesday, January 25, 2023 16:27:32 UTC
///
/// Changing the epoch changes the encoding of every ID. Version it if IDs
/// are persisted or compared across deployments.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_674_635_252_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The unit is **milliseconds** relative to a configurable origin. The value
/// is signed: a reading before the origin is negative and the generator
/// treats it as a clock regression.
///
/// # Example
///
/// ```
/// use snowmint::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> i64;

    /// Converts an epoch-relative reading back to Unix milliseconds.
    ///
    /// The default assumes [`DEFAULT_EPOCH`]. Sources with another origin
    /// should override it so errors report the real wall-clock time.
    fn to_unix_millis(&self, millis: i64) -> i64 {
        (DEFAULT_EPOCH.as_millis() as i64).saturating_add(millis)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }

    fn to_unix_millis(&self, millis: i64) -> i64 {
        (**self).to_unix_millis(millis)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }

    fn to_unix_millis(&self, millis: i64) -> i64 {
        (**self).to_unix_millis(millis)
    }
}
