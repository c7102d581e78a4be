use core::time::Duration;

use crate::Result;

/// A trait that abstracts over how the generator blocks while waiting for a
/// regressed clock to catch up.
///
/// The wait is bounded and short (under 10 ms). Implementations may return
/// [`Error::Cancelled`] to abort it; the generator then propagates the error
/// without issuing an ID.
///
/// [`Error::Cancelled`]: crate::Error::Cancelled
pub trait SleepProvider {
    /// Blocks the calling thread for `dur`, or until interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the wait was interrupted.
    ///
    /// [`Error::Cancelled`]: crate::Error::Cancelled
    fn sleep_for(&self, dur: Duration) -> Result<()>;
}

impl<S: SleepProvider + ?Sized> SleepProvider for &S {
    fn sleep_for(&self, dur: Duration) -> Result<()> {
        (**self).sleep_for(dur)
    }
}
