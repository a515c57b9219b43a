//! Math type re-exports and flattening helpers.
//!
//! Positions, UVs, bone directions and keyframe points are glam vectors;
//! the binary formats store them as flat float runs.

pub use glam::{Vec2, Vec3};

/// Flatten a slice of 3-vectors into `x, y, z, x, y, z, ...`.
#[inline]
pub fn flatten_vec3(values: &[Vec3]) -> &[f32] {
    bytemuck::cast_slice(values)
}

/// Flatten a slice of 2-vectors into `x, y, x, y, ...`.
#[inline]
pub fn flatten_vec2(values: &[Vec2]) -> &[f32] {
    bytemuck::cast_slice(values)
}

/// Exact component-wise equality, as the seam-double search needs it.
///
/// `0.0` and `-0.0` compare equal and NaN never does, matching IEEE `==`.
#[inline]
pub fn exact_eq(a: Vec3, b: Vec3) -> bool {
    a.x == b.x && a.y == b.y && a.z == b.z
}
