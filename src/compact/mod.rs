//! Data compaction ahead of encoding.
//!
//! - [`GeometryCompactor`] - flattened indices/positions, seam doubles, per-vertex UVs
//! - [`encode_skin_weights`] - per-vertex (bone index, weight) records

pub mod geometry;
pub mod skin;

pub use geometry::{find_doubles, seam_vertices, CompactGeometry, GeometryCompactor};
pub use skin::{encode_skin_weights, skin_section_len, SkinRecord, VertexSkin};
