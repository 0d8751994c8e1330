//! Annotation geometry for text detection samples.

mod big_gt;
mod bounding_box;
mod quad;

pub use big_gt::*;
pub use bounding_box::*;
pub use quad::*;
