//! # sch3D
//!
//! Writers for the sch3D binary asset formats: meshes, armatures and their
//! animation clips, stored big-endian for a game-engine loader.
//!
//! The host scene (the 3D editor) is read elsewhere and handed in as plain
//! data: [`MeshData`], [`ArmatureData`] and [`ActionData`]. The crate
//! validates it, compacts it and writes one file per asset.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`encoder`] - Big-endian field writer and format constants
//! - [`scene`] - Host scene input types
//! - [`compact`] - Geometry and skin weight compaction
//! - [`anim`] - Keyframe curves and movement blocks
//! - [`options`] - Per-format export options
//! - [`export`] - File writers and batch export
//! - [`decode`] - Readers for the written files
//!
//! ## Example
//!
//! ```ignore
//! use sch3d::prelude::*;
//!
//! let report = export_mesh("out", "crate", &mesh, None, &MeshOptions::default())?;
//! println!("{} bytes", report.bytes_written);
//! ```

pub mod util;
pub mod encoder;
pub mod scene;
pub mod compact;
pub mod anim;
pub mod options;
pub mod export;
pub mod decode;

// Re-export commonly used types
pub use util::{Error, Result};
pub use scene::{ActionData, ArmatureData, Bone, Keyframe, MeshData};
pub use export::{export_armature, export_mesh, export_movements, ExportBatch, ExportReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Vec2, Vec3};
    pub use crate::scene::*;
    pub use crate::options::*;
    pub use crate::export::*;
    pub use crate::decode::{read_armature_file, read_mesh_file, read_movements_file};
}
