//! `.sch3Dmesh` reader.

use std::path::Path;

use crate::compact::SkinRecord;
use crate::encoder::{MESH_FLAG_ARMATURE, MESH_FLAG_TEXTURED, MESH_FLAG_TRIS};
use crate::util::Result;

use super::{load_file, BinaryDecoder};

/// Contents of a mesh file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedMesh {
    pub tris: bool,
    pub textured: bool,
    pub armature_indexed: bool,
    pub indices: Vec<u16>,
    pub positions: Vec<f32>,
    pub doubles: Vec<(u16, u16)>,
    pub uvs: Vec<f32>,
    pub skin: Vec<Vec<SkinRecord>>,
}

impl DecodedMesh {
    /// Polygon arity implied by the `tris` flag.
    pub fn arity(&self) -> usize {
        if self.tris {
            3
        } else {
            4
        }
    }

    pub fn num_faces(&self) -> usize {
        self.indices.len() / self.arity()
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Decode a complete mesh file.
pub fn decode_mesh(data: &[u8]) -> Result<DecodedMesh> {
    let mut dec = BinaryDecoder::new(data);
    dec.read_version()?;
    let flags = dec.read_u8()?;
    let mut mesh = DecodedMesh {
        tris: flags & MESH_FLAG_TRIS != 0,
        textured: flags & MESH_FLAG_TEXTURED != 0,
        armature_indexed: flags & MESH_FLAG_ARMATURE != 0,
        ..Default::default()
    };

    let faces = dec.read_u16()? as usize;
    let vertices = dec.read_u16()? as usize;
    mesh.indices = dec.read_shorts(faces * mesh.arity())?;
    mesh.positions = dec.read_floats(vertices * 3)?;

    if mesh.textured {
        let doubles = dec.read_u16()? as usize;
        mesh.doubles = dec
            .read_shorts(doubles * 2)?
            .chunks_exact(2)
            .map(|p| (p[0], p[1]))
            .collect();
        mesh.uvs = dec.read_floats(vertices * 2)?;
    }

    if mesh.armature_indexed {
        mesh.skin = (0..vertices)
            .map(|_| {
                let count = dec.read_u8()?;
                (0..count)
                    .map(|_| Ok(SkinRecord { bone: dec.read_u8()?, weight: dec.read_f32()? }))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
    }

    dec.expect_end()?;
    Ok(mesh)
}

/// Read and decode a mesh file from disk.
pub fn read_mesh_file(path: impl AsRef<Path>) -> Result<DecodedMesh> {
    decode_mesh(&load_file(path)?)
}
