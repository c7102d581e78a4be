#[cfg(feature = "parking-lot")]
pub use parking_lot::{Condvar, Mutex, MutexGuard};
#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
