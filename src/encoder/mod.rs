//! Big-endian binary encoder.
//!
//! Every sch3D file is a flat run of big-endian fields with no padding:
//!
//! ```text
//! +------------------+
//! | Version          |  4 bytes (i32 BE, always 1)
//! +------------------+
//! | ... Fields ...   |  format specific
//! +------------------+
//! ```

mod constants;
mod stream;

pub use constants::*;
pub use stream::*;
