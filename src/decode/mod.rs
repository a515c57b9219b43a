//! Readers for the three sch3D formats.
//!
//! Decoding mirrors what the runtime loader does and is used to inspect
//! exported files. Every decoder takes the complete file contents; the
//! `read_*_file` helpers load them from disk first.

mod stream;
mod source;
mod mesh;
mod movements;
mod armature;

pub use stream::BinaryDecoder;
pub use source::{load_file, FileData};
pub use mesh::{decode_mesh, read_mesh_file, DecodedMesh};
pub use movements::{decode_movements, read_movements_file, DecodedMovement};
pub use armature::{decode_armature, read_armature_file, DecodedArmature, DecodedBone, DecodedClip};
