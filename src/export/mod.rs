//! File writers for the three sch3D formats.
//!
//! Each writer validates and encodes the whole payload in memory, then writes
//! it to `<directory>/<name>.<extension>` in one go. A rejected export leaves
//! the filesystem untouched.
//!
//! - [`export_mesh`] - `.sch3Dmesh`
//! - [`export_armature`] - `.sch3Darmature`
//! - [`export_movements`] - `.sch3Dmovements`
//! - [`ExportBatch`] - several jobs into one directory

mod report;
mod mesh;
mod armature;
mod movements;
mod batch;

pub use report::{EncodedFile, ExportReport, ExportWarning};
pub use mesh::{encode_mesh, export_mesh};
pub use armature::{encode_armature, export_armature};
pub use movements::{encode_movements, export_movements};
pub use batch::{ArmatureJob, BatchReport, ExportBatch, MeshJob, MovementJob, RotationMode};
