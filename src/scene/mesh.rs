//! Mesh input data.

use smallvec::SmallVec;

use crate::util::{Error, Result, Vec2, Vec3};

/// One polygon: vertex indices of a triangle or quad.
pub type Polygon = SmallVec<[u32; 4]>;

/// Weights of one vertex, one entry per vertex group it belongs to.
pub type VertexWeights = SmallVec<[GroupWeight; 4]>;

/// Membership of a vertex in a vertex group.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupWeight {
    /// Index into [`MeshData::vertex_groups`].
    pub group: usize,
    pub weight: f32,
}

impl GroupWeight {
    pub fn new(group: usize, weight: f32) -> Self {
        Self { group, weight }
    }
}

/// Finalized mesh as produced by the host.
///
/// Polygons are expected to be all triangles or all quads, duplicate vertices
/// removed and seam edges already split.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Polygons, each a list of vertex indices.
    pub polygons: Vec<Polygon>,
    /// UV per polygon corner, in polygon order (optional).
    pub corner_uvs: Option<Vec<Vec2>>,
    /// Edges produced by splitting UV seams, as vertex index pairs.
    pub seam_edges: Vec<[u32; 2]>,
    /// Vertex group names; a group binds to the armature bone of the same name.
    pub vertex_groups: Vec<String>,
    /// Group memberships per vertex (optional).
    pub vertex_weights: Option<Vec<VertexWeights>>,
}

impl MeshData {
    /// Create a mesh from positions and polygons.
    pub fn new(positions: Vec<Vec3>, polygons: Vec<Polygon>) -> Self {
        Self {
            positions,
            polygons,
            ..Default::default()
        }
    }

    /// Attach per-corner UVs.
    pub fn with_uvs(mut self, corner_uvs: Vec<Vec2>) -> Self {
        self.corner_uvs = Some(corner_uvs);
        self
    }

    /// Attach seam edges.
    pub fn with_seams(mut self, seam_edges: Vec<[u32; 2]>) -> Self {
        self.seam_edges = seam_edges;
        self
    }

    /// Attach vertex groups and per-vertex weights.
    pub fn with_weights(mut self, groups: Vec<String>, weights: Vec<VertexWeights>) -> Self {
        self.vertex_groups = groups;
        self.vertex_weights = Some(weights);
        self
    }

    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get number of polygons.
    pub fn num_faces(&self) -> usize {
        self.polygons.len()
    }

    /// Get total number of polygon corners.
    pub fn num_corners(&self) -> usize {
        self.polygons.iter().map(|p| p.len()).sum()
    }

    /// Check if mesh has UVs.
    pub fn has_uvs(&self) -> bool {
        self.corner_uvs.is_some()
    }

    /// Check if mesh has vertex weights.
    pub fn has_weights(&self) -> bool {
        self.vertex_weights.is_some()
    }

    /// Shared polygon arity (3 or 4).
    ///
    /// Fails on mixed arity or on any other polygon size. An empty mesh
    /// reports triangles.
    pub fn arity(&self) -> Result<usize> {
        let Some(first) = self.polygons.first() else {
            return Ok(3);
        };
        let expected = first.len();
        if expected != 3 && expected != 4 {
            return Err(Error::UnsupportedArity(expected));
        }
        if let Some((polygon, p)) = self
            .polygons
            .iter()
            .enumerate()
            .find(|(_, p)| p.len() != expected)
        {
            return Err(Error::MixedArity { polygon, expected, actual: p.len() });
        }
        Ok(expected)
    }

    /// Check if a vertex group has at least one vertex with nonzero weight.
    pub fn group_has_influence(&self, group: usize) -> bool {
        self.vertex_weights.as_ref().is_some_and(|weights| {
            weights
                .iter()
                .flatten()
                .any(|gw| gw.group == group && gw.weight != 0.0)
        })
    }

    /// Look up a vertex group by name.
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.vertex_groups.iter().position(|g| g == name)
    }
}
