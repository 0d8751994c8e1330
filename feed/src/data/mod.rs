//! Dataset scanning, annotation parsing and sample generation.

mod annotation;
mod generator;
mod sample;
mod scan;
mod visualize;

pub use annotation::*;
pub use generator::*;
pub use sample::*;
pub use scan::*;
pub use visualize::*;
