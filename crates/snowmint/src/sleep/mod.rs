mod cancellable;
mod interface;
mod thread;

pub use cancellable::*;
pub use interface::*;
pub use thread::*;
