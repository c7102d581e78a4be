mod lock;
mod waiter;

pub use lock::*;
pub use waiter::*;
