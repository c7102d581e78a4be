use core::time::Duration;
use std::{sync::Arc, time::Instant};

use portable_atomic::{AtomicBool, Ordering};

use crate::{
    Error, Result, SleepProvider,
    mutex::{Condvar, Mutex},
};

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// A [`SleepProvider`] whose waits can be interrupted from another thread.
///
/// A call to [`CancelHandle::cancel`] is delivered to exactly one wait: the
/// one in progress, or else the next one to start. That wait returns
/// [`Error::Cancelled`] and clears the request, so later waits sleep normally.
/// A pending request that is no longer wanted can be dropped with
/// [`CancelHandle::reset`]. Generators using this provider issue IDs normally
/// as long as the clock does not regress.
///
/// # Example
///
/// ```
/// use snowmint::{CancellableSleep, SleepProvider};
/// use std::time::Duration;
///
/// let sleep = CancellableSleep::new();
/// let handle = sleep.handle();
///
/// handle.cancel();
/// assert!(sleep.sleep_for(Duration::from_millis(5)).unwrap_err().is_cancelled());
/// assert!(sleep.sleep_for(Duration::from_millis(1)).is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellableSleep {
    inner: Arc<Inner>,
}

/// Cancels waits on the [`CancellableSleep`] it was created from.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    inner: Arc<Inner>,
}

impl CancellableSleep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle that can cancel this provider's waits.
    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }
}

impl CancelHandle {
    /// Interrupts the in-progress wait, or the next one if none is running.
    pub fn cancel(&self) {
        // Set under the lock so a sleeper between its check and its wait
        // cannot miss the notification.
        let _guard = {
            #[cfg(feature = "parking-lot")]
            {
                self.inner.lock.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.inner
                    .lock
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
            }
        };
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.wake.notify_all();
    }

    /// Drops a cancellation that no wait has observed yet.
    pub fn reset(&self) {
        self.inner.cancelled.store(false, Ordering::Release);
    }

    /// Returns `true` while a cancellation is pending.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }
}

impl SleepProvider for CancellableSleep {
    fn sleep_for(&self, dur: Duration) -> Result<()> {
        let deadline = Instant::now() + dur;

        #[cfg(feature = "parking-lot")]
        let mut guard = self.inner.lock.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut guard = self.inner.lock.lock()?;

        loop {
            if self.inner.cancelled.swap(false, Ordering::AcqRel) {
                return Err(Error::Cancelled);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }

            #[cfg(feature = "parking-lot")]
            {
                self.inner.wake.wait_for(&mut guard, deadline - now);
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                guard = self
                    .inner
                    .wake
                    .wait_timeout(guard, deadline - now)
                    .map_err(|_| Error::LockPoisoned)?
                    .0;
            }
        }
    }
}
