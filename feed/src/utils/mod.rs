//! Misc utilities.

mod rate_counter;
mod stop_flag;

pub use rate_counter::*;
pub use stop_flag::*;
