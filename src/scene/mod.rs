//! Scene data handed over by the host for one export call.
//!
//! - [`MeshData`] - Finalized polygon mesh (already triangulated and seam-split)
//! - [`ArmatureData`] / [`Bone`] - Bone forest
//! - [`ActionData`] / [`Keyframe`] / [`ChannelKey`] - Animation clips
//!
//! The exporter only reads these structures; it never edits them.

pub mod mesh;
pub mod armature;
pub mod action;

pub use mesh::{GroupWeight, MeshData, Polygon, VertexWeights};
pub use armature::{ArmatureData, Bone};
pub use action::{ActionData, Axis, ChannelKey, ChannelMap, Keyframe, QuatComponent};
