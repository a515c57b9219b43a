//! Utility types and functions for sch3d.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod error;
mod math;

pub use error::*;
pub use math::*;

pub(crate) use error::check_count;
