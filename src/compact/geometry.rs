//! Geometry compaction.
//!
//! Turns a finalized [`MeshData`] into the flat arrays the mesh format stores,
//! and finds "doubles": seam vertices sharing a position but carrying
//! different UVs, so the runtime can weld them for normals and skinning.

use std::collections::HashSet;

use crate::encoder::MAX_U16;
use crate::scene::MeshData;
use crate::util::{check_count, exact_eq, flatten_vec2, flatten_vec3, Error, Result, Vec2, Vec3};

/// Flattened mesh arrays ready for the mesh writer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompactGeometry {
    /// Polygon arity (3 or 4).
    pub arity: usize,
    /// Vertex indices, `arity` per face.
    pub indices: Vec<u16>,
    /// Positions, 3 floats per vertex.
    pub positions: Vec<f32>,
    /// Seam double pairs (textured only).
    pub doubles: Vec<(u16, u16)>,
    /// UVs, 2 floats per vertex (textured only).
    pub uvs: Vec<f32>,
    /// Vertices no polygon references; their UV resolved to (0, 0).
    pub unreferenced: Vec<usize>,
}

impl CompactGeometry {
    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.indices.len() / self.arity.max(1)
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Builds [`CompactGeometry`] from a mesh.
pub struct GeometryCompactor<'a> {
    mesh: &'a MeshData,
    textured: bool,
}

impl<'a> GeometryCompactor<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh, textured: false }
    }

    /// Also produce doubles and per-vertex UVs.
    pub fn textured(mut self, textured: bool) -> Self {
        self.textured = textured;
        self
    }

    /// Validate the mesh and flatten it.
    pub fn compact(&self) -> Result<CompactGeometry> {
        let mesh = self.mesh;
        let arity = mesh.arity()?;
        let vertex_count = mesh.num_vertices();
        check_count("vertex", vertex_count, MAX_U16)?;
        check_count("face", mesh.num_faces(), MAX_U16)?;

        let mut indices = Vec::with_capacity(mesh.num_corners());
        for &index in mesh.polygons.iter().flatten() {
            if index as usize >= vertex_count {
                return Err(Error::IndexOutOfRange {
                    what: "polygon vertex",
                    index: index as usize,
                    count: vertex_count,
                });
            }
            // vertex_count <= u16::MAX, so every valid index fits.
            indices.push(index as u16);
        }

        let mut out = CompactGeometry {
            arity,
            indices,
            positions: flatten_vec3(&mesh.positions).to_vec(),
            ..Default::default()
        };

        if self.textured {
            let seams = seam_vertices(mesh)?;
            out.doubles = find_doubles(&mesh.positions, &seams)?
                .into_iter()
                .map(|(a, b)| (a as u16, b as u16))
                .collect();
            check_count("double", out.doubles.len(), MAX_U16)?;

            let (uvs, unreferenced) = resolve_vertex_uvs(mesh)?;
            out.uvs = flatten_vec2(&uvs).to_vec();
            out.unreferenced = unreferenced;
        }

        Ok(out)
    }
}

/// Vertices touched by a seam edge, in first-appearance order.
pub fn seam_vertices(mesh: &MeshData) -> Result<Vec<u32>> {
    let count = mesh.num_vertices();
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for &v in mesh.seam_edges.iter().flatten() {
        if v as usize >= count {
            return Err(Error::IndexOutOfRange { what: "seam vertex", index: v as usize, count });
        }
        if seen.insert(v) {
            order.push(v);
        }
    }
    Ok(order)
}

/// Pairs of seam vertices whose positions are exactly equal.
///
/// Each unordered pair appears once, as (earlier, later) in `seams` order.
/// Quadratic in the seam vertex count.
pub fn find_doubles(positions: &[Vec3], seams: &[u32]) -> Result<Vec<(u32, u32)>> {
    let count = positions.len();
    if let Some(&v) = seams.iter().find(|&&v| v as usize >= count) {
        return Err(Error::IndexOutOfRange { what: "seam vertex", index: v as usize, count });
    }
    let mut doubles = Vec::new();
    for (i, &a) in seams.iter().enumerate() {
        for &b in &seams[i + 1..] {
            if exact_eq(positions[a as usize], positions[b as usize]) {
                doubles.push((a, b));
            }
        }
    }
    Ok(doubles)
}

/// UV per vertex, taken from the first polygon corner referencing it.
///
/// Returns the UVs and the vertices no polygon references.
fn resolve_vertex_uvs(mesh: &MeshData) -> Result<(Vec<Vec2>, Vec<usize>)> {
    let corner_uvs = mesh.corner_uvs.as_deref().ok_or(Error::MissingUvs)?;
    if corner_uvs.len() != mesh.num_corners() {
        return Err(Error::MissingUvs);
    }

    let mut uvs: Vec<Option<Vec2>> = vec![None; mesh.num_vertices()];
    for (&v, &uv) in mesh.polygons.iter().flatten().zip(corner_uvs) {
        let slot = &mut uvs[v as usize];
        if slot.is_none() {
            *slot = Some(uv);
        }
    }

    let unreferenced: Vec<usize> = uvs
        .iter()
        .enumerate()
        .filter(|(_, uv)| uv.is_none())
        .map(|(i, _)| i)
        .collect();
    Ok((uvs.into_iter().map(|uv| uv.unwrap_or(Vec2::ZERO)).collect(), unreferenced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    /// Two triangles split along a seam: vertices 1/3 and 2/4 coincide.
    fn split_quad() -> MeshData {
        MeshData::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            vec![smallvec![0, 1, 2], smallvec![3, 5, 4]],
        )
        .with_uvs(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.0),
            Vec2::new(0.0, 0.5),
            Vec2::new(0.6, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.6, 0.5),
        ])
        .with_seams(vec![[1, 2], [3, 4]])
    }

    #[test]
    fn test_untextured_flatten() {
        let geom = GeometryCompactor::new(&split_quad()).compact().unwrap();
        assert_eq!(geom.arity, 3);
        assert_eq!(geom.indices, vec![0, 1, 2, 3, 5, 4]);
        assert_eq!(geom.num_faces() * geom.arity, geom.indices.len());
        assert_eq!(geom.num_vertices() * 3, geom.positions.len());
        assert!(geom.doubles.is_empty());
        assert!(geom.uvs.is_empty());
    }

    #[test]
    fn test_doubles_on_seam() {
        let geom = GeometryCompactor::new(&split_quad()).textured(true).compact().unwrap();
        assert_eq!(geom.doubles, vec![(1, 3), (2, 4)]);
    }

    #[test]
    fn test_doubles_ignore_non_seam_vertices() {
        let mut mesh = split_quad();
        // Vertex 0 now coincides with vertex 5 but neither lies on a seam.
        mesh.positions[0] = mesh.positions[5];
        let geom = GeometryCompactor::new(&mesh).textured(true).compact().unwrap();
        assert_eq!(geom.doubles, vec![(1, 3), (2, 4)]);
    }

    #[test]
    fn test_doubles_require_exact_match() -> Result<()> {
        let positions = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 3.000_001)];
        assert!(find_doubles(&positions, &[0, 1])?.is_empty());
        let positions = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 3.0)];
        assert_eq!(find_doubles(&positions, &[1, 0])?, vec![(1, 0)]);
        Ok(())
    }

    #[test]
    fn test_doubles_reject_seam_outside_positions() {
        let err = find_doubles(&[Vec3::ZERO], &[0, 5]).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange { what: "seam vertex", index: 5, count: 1 }
        ));
    }

    #[test]
    fn test_seam_vertex_order() {
        let mesh = split_quad().with_seams(vec![[4, 1], [1, 2], [2, 4]]);
        assert_eq!(seam_vertices(&mesh).unwrap(), vec![4, 1, 2]);

        let bad = split_quad().with_seams(vec![[0, 6]]);
        assert!(matches!(seam_vertices(&bad), Err(Error::IndexOutOfRange { index: 6, .. })));
    }

    #[test]
    fn test_uv_from_first_polygon() {
        let mut mesh = split_quad();
        // Vertex 1 also used by the second triangle with a different UV.
        mesh.polygons[1] = smallvec![1, 5, 4];
        let geom = GeometryCompactor::new(&mesh).textured(true).compact().unwrap();
        assert_eq!(&geom.uvs[2..4], &[0.5, 0.0]);
        assert_eq!(geom.uvs.len(), 12);
        // Vertex 3 is no longer referenced.
        assert_eq!(geom.unreferenced, vec![3]);
        assert_eq!(&geom.uvs[6..8], &[0.0, 0.0]);
    }

    #[test]
    fn test_textured_requires_uvs() {
        let mut mesh = split_quad();
        mesh.corner_uvs = None;
        let err = GeometryCompactor::new(&mesh).textured(true).compact().unwrap_err();
        assert!(matches!(err, Error::MissingUvs));

        let mut short = split_quad();
        short.corner_uvs.as_mut().unwrap().pop();
        assert!(GeometryCompactor::new(&short).textured(true).compact().is_err());
    }

    #[test]
    fn test_index_out_of_range() {
        let mesh = MeshData::new(vec![Vec3::ZERO; 3], vec![smallvec![0, 1, 3]]);
        let err = GeometryCompactor::new(&mesh).compact().unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_vertex_count_limit() {
        let mesh = MeshData::new(vec![Vec3::ZERO; MAX_U16 + 1], vec![]);
        let err = GeometryCompactor::new(&mesh).compact().unwrap_err();
        assert!(matches!(err, Error::CountOverflow { what: "vertex", .. }));
    }

    #[test]
    fn test_face_count_limit() {
        let at_limit = MeshData::new(vec![Vec3::ZERO; 3], vec![smallvec![0, 1, 2]; MAX_U16]);
        assert!(GeometryCompactor::new(&at_limit).compact().is_ok());

        let over = MeshData::new(vec![Vec3::ZERO; 3], vec![smallvec![0, 1, 2]; MAX_U16 + 1]);
        let err = GeometryCompactor::new(&over).compact().unwrap_err();
        assert!(matches!(
            err,
            Error::CountOverflow { what: "face", count: 65536, limit: 65535 }
        ));
    }
}
