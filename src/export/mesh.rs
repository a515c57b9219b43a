//! `.sch3Dmesh` writer.
//!
//! ```text
//! version (i32) | flags (u8) | faceCount (u16) | vertexCount (u16)
//! indices (u16 * faceCount * arity) | positions (f32 * vertexCount * 3)
//! [textured]  doubleCount (u16) | pairs (u16, u16) | uvs (f32 * vertexCount * 2)
//! [armature]  per vertex: count (u8) | (bone (u8), weight (f32)) * count
//! ```

use std::path::Path;
use std::time::Instant;

use crate::compact::{encode_skin_weights, skin_section_len, GeometryCompactor, VertexSkin};
use crate::encoder::{BinaryEncoder, FORMAT_VERSION, MESH_EXTENSION};
use crate::options::MeshOptions;
use crate::scene::{ArmatureData, MeshData};
use crate::util::Result;

use super::report::{EncodedFile, ExportReport, ExportWarning};

/// Validate and encode a mesh file in memory.
///
/// `armature` resolves vertex groups to bone indices when
/// `options.armature_indexed` is set.
pub fn encode_mesh(
    mesh: &MeshData,
    armature: Option<&ArmatureData>,
    options: &MeshOptions,
) -> Result<EncodedFile> {
    let start = Instant::now();
    let geom = GeometryCompactor::new(mesh).textured(options.textured).compact()?;

    let skin: Option<Vec<VertexSkin>> = if options.armature_indexed {
        let empty = ArmatureData::default();
        Some(encode_skin_weights(mesh, armature.unwrap_or(&empty))?)
    } else {
        None
    };
    tracing::debug!(
        faces = geom.num_faces(),
        vertices = geom.num_vertices(),
        doubles = geom.doubles.len(),
        skin_bytes = skin.as_deref().map_or(0, skin_section_len),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "mesh compacted"
    );

    let mut warnings = Vec::new();
    if let Some(&first) = geom.unreferenced.first() {
        tracing::warn!(
            count = geom.unreferenced.len(),
            first,
            "vertices belong to no polygon; UV set to (0, 0)"
        );
        warnings.push(ExportWarning::UnreferencedVertices { count: geom.unreferenced.len(), first });
    }

    let mut enc = BinaryEncoder::in_memory();
    enc.write_i32(FORMAT_VERSION)?;
    enc.write_flags(&[geom.arity == 3, options.textured, options.armature_indexed], 1)?;
    // Counts were range checked by the compactor.
    enc.write_u16(geom.num_faces() as u16)?;
    enc.write_u16(geom.num_vertices() as u16)?;
    enc.write_all_shorts(&geom.indices)?;
    enc.write_all_floats(&geom.positions)?;

    if options.textured {
        enc.write_u16(geom.doubles.len() as u16)?;
        enc.write_all_short_pairs(&geom.doubles)?;
        enc.write_all_floats(&geom.uvs)?;
    }

    if let Some(skin) = skin {
        for records in &skin {
            enc.write_u8(records.len() as u8)?;
            for r in records {
                enc.write_u8(r.bone)?;
                enc.write_f32(r.weight)?;
            }
        }
    }

    Ok(EncodedFile { bytes: enc.finish()?, warnings })
}

/// Export `mesh` to `directory/name.sch3Dmesh`.
pub fn export_mesh(
    directory: impl AsRef<Path>,
    name: &str,
    mesh: &MeshData,
    armature: Option<&ArmatureData>,
    options: &MeshOptions,
) -> Result<ExportReport> {
    let file_name = format!("{}.{}", name, MESH_EXTENSION);
    let _span = tracing::info_span!("export_mesh", file = %file_name).entered();
    let encoded = encode_mesh(mesh, armature, options)?;
    let report = encoded.write_to(directory.as_ref(), &file_name)?;
    tracing::info!(mesh = name, bytes = report.bytes_written, "exported mesh");
    Ok(report)
}
