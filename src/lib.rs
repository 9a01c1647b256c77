//! Pixel-level visual regression checks.
//!
//! [`ImageDiffer`] compares a reference screenshot against a freshly captured one, reports the
//! share of pixels that changed and, when that share exceeds the allowed [`Threshold`], writes a
//! `reference | annotated current | diff` composite with every changed region circled.

pub mod compare;
pub mod error;
pub mod threshold;
pub mod utils;

pub use compare::{Comparison, Config, ImageDiffer, MissingImage, ResizePolicy};
pub use compare::region::Region;
pub use error::CompareError;
pub use threshold::Threshold;
