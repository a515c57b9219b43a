//! Skin weight compaction.

use smallvec::SmallVec;

use crate::encoder::MAX_U8;
use crate::scene::{ArmatureData, MeshData};
use crate::util::{check_count, Error, Result};

/// One bone influence as stored in the mesh file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinRecord {
    pub bone: u8,
    pub weight: f32,
}

/// Influences of one vertex, in source group order.
pub type VertexSkin = SmallVec<[SkinRecord; 4]>;

/// Resolve each vertex's group weights to bone-indexed records.
///
/// Zero weights are dropped. Order is kept as given: no sorting,
/// renormalisation or cap on the influence count beyond the one-byte field.
pub fn encode_skin_weights(mesh: &MeshData, armature: &ArmatureData) -> Result<Vec<VertexSkin>> {
    let weights = mesh.vertex_weights.as_deref().ok_or(Error::MissingWeights)?;
    if weights.len() != mesh.num_vertices() {
        return Err(Error::MissingWeights);
    }

    // Bind groups lazily so an unused, unbound group is not an error.
    let bindings: Vec<Option<usize>> = mesh
        .vertex_groups
        .iter()
        .map(|name| armature.bone_index(name))
        .collect();

    let mut out = Vec::with_capacity(weights.len());
    for vertex in weights {
        let mut records = VertexSkin::new();
        for gw in vertex.iter().filter(|gw| gw.weight != 0.0) {
            let binding = bindings.get(gw.group).ok_or(Error::IndexOutOfRange {
                what: "vertex group",
                index: gw.group,
                count: bindings.len(),
            })?;
            let bone = binding
                .ok_or_else(|| Error::UnboundBoneGroup(mesh.vertex_groups[gw.group].clone()))?;
            check_count("bone index", bone, MAX_U8)?;
            records.push(SkinRecord { bone: bone as u8, weight: gw.weight });
        }
        check_count("influence", records.len(), MAX_U8)?;
        out.push(records);
    }
    Ok(out)
}

/// Byte length of the skin section: one count byte plus five bytes per record.
pub fn skin_section_len(skin: &[VertexSkin]) -> usize {
    skin.iter().map(|v| 1 + 5 * v.len()).sum()
}
