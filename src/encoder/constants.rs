//! Format constants shared by the writers and the decoder.

/// Version marker written at the start of every file.
pub const FORMAT_VERSION: i32 = 1;

/// Mesh file extension.
pub const MESH_EXTENSION: &str = "sch3Dmesh";

/// Armature file extension.
pub const ARMATURE_EXTENSION: &str = "sch3Darmature";

/// Movements file extension.
pub const MOVEMENTS_EXTENSION: &str = "sch3Dmovements";

/// Mesh flag bits (`tris`, `textured`, `armature-indexed`).
pub const MESH_FLAG_TRIS: u8 = 1 << 0;
pub const MESH_FLAG_TEXTURED: u8 = 1 << 1;
pub const MESH_FLAG_ARMATURE: u8 = 1 << 2;

/// Movement flag bits (`location`, `rotation`, `uniform scale`, `axis scale`).
pub const MOVE_FLAG_LOCATION: u8 = 1 << 0;
pub const MOVE_FLAG_ROTATION: u8 = 1 << 1;
pub const MOVE_FLAG_SCALE_UNIFORM: u8 = 1 << 2;
pub const MOVE_FLAG_SCALE_AXIS: u8 = 1 << 3;

/// Float written in place of a bone curve when the bone has no rotation in a clip.
pub const NO_BONE_CURVE: f32 = 0.0;

/// Largest vertex, face or index value a u16 field holds.
pub const MAX_U16: usize = u16::MAX as usize;

/// Largest bone count, influence count or bone index a u8 field holds.
pub const MAX_U8: usize = u8::MAX as usize;

/// Largest keyframe count: the file stores `count - 1` in a signed byte.
pub const MAX_KEYFRAMES: usize = i8::MAX as usize + 1;
