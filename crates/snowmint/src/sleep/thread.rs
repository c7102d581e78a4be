use core::time::Duration;

use crate::{Result, SleepProvider};

/// An implementation of [`SleepProvider`] using [`std::thread::sleep`].
///
/// This is the default provider. It cannot be interrupted; use
/// [`CancellableSleep`] when callers need to abort a wait.
///
/// [`CancellableSleep`]: crate::CancellableSleep
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadSleep;

impl SleepProvider for ThreadSleep {
    fn sleep_for(&self, dur: Duration) -> Result<()> {
        std::thread::sleep(dur);
        Ok(())
    }
}
