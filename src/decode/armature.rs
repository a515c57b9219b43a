//! `.sch3Darmature` reader.

use std::path::Path;

use crate::encoder::NO_BONE_CURVE;
use crate::scene::Keyframe;
use crate::util::{Error, Result, Vec3};

use super::movements::{read_curve, read_movement};
use super::{load_file, BinaryDecoder, DecodedMovement};

/// One bone record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedBone {
    pub direction: Vec3,
    /// 0-based parent index (the file stores it 1-based).
    pub parent: Option<usize>,
}

/// One clip: the armature object's movement block and per-bone rotations.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedClip {
    pub movement: DecodedMovement,
    /// Per bone: `x, y, z, w` rotation curves, or `None` for the sentinel.
    pub bone_rotations: Vec<Option<[Vec<Keyframe>; 4]>>,
}

/// Contents of an armature file.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedArmature {
    pub bones: Vec<DecodedBone>,
    pub clips: Vec<DecodedClip>,
}

fn read_bone_rotation(
    dec: &mut BinaryDecoder<'_>,
    keyframes: Option<usize>,
) -> Result<Option<[Vec<Keyframe>; 4]>> {
    if dec.peek_f32()? == NO_BONE_CURVE {
        dec.read_f32()?;
        return Ok(None);
    }
    let n = keyframes.ok_or_else(|| {
        Error::invalid(format!("bone curve at position {} in a clip without keyframes", dec.pos()))
    })?;
    Ok(Some([
        read_curve(dec, n)?,
        read_curve(dec, n)?,
        read_curve(dec, n)?,
        read_curve(dec, n)?,
    ]))
}

/// Decode a complete armature file.
pub fn decode_armature(data: &[u8]) -> Result<DecodedArmature> {
    let mut dec = BinaryDecoder::new(data);
    dec.read_version()?;

    let count = dec.read_u8()? as usize;
    let mut bones = Vec::with_capacity(count);
    for i in 0..count {
        let direction = Vec3::new(dec.read_f32()?, dec.read_f32()?, dec.read_f32()?);
        let parent = match dec.read_u8()? as usize {
            0 => None,
            p if p <= count && p - 1 != i => Some(p - 1),
            p => return Err(Error::invalid(format!("bone {} has parent index {}", i, p))),
        };
        bones.push(DecodedBone { direction, parent });
    }

    let mut clips = Vec::new();
    while !dec.is_empty() {
        let movement = read_movement(&mut dec)?;
        let bone_rotations = (0..count)
            .map(|_| read_bone_rotation(&mut dec, movement.keyframe_count))
            .collect::<Result<Vec<_>>>()?;
        clips.push(DecodedClip { movement, bone_rotations });
    }

    Ok(DecodedArmature { bones, clips })
}

/// Read and decode an armature file from disk.
pub fn read_armature_file(path: impl AsRef<Path>) -> Result<DecodedArmature> {
    decode_armature(&load_file(path)?)
}
