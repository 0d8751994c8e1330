//! Parallel sample production through a bounded queue.

mod bridge;
mod enqueuer;
mod pool;

pub use bridge::*;
pub use enqueuer::*;
pub use pool::*;
