//! `.sch3Darmature` writer.
//!
//! ```text
//! version (i32) | boneCount (u8)
//! per bone:  direction (f32 * 3) | parent (u8, 0 = root, else index + 1)
//! per clip:  movement block | per bone: rotation curve (x, y, z, w) or 0.0 (f32)
//! ```

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::anim::{encode_curve, sorted_keyframes, KeyframeCount, MovementBlock};
use crate::encoder::{BinaryEncoder, ARMATURE_EXTENSION, FORMAT_VERSION, MAX_U8, NO_BONE_CURVE};
use crate::options::ArmatureOptions;
use crate::scene::{ActionData, ArmatureData, Bone, ChannelKey, Keyframe, QuatComponent};
use crate::util::{check_count, Error, Result};

use super::report::{EncodedFile, ExportReport, ExportWarning};

/// Rotation curve of one bone in one clip.
enum BoneCurve {
    /// Bone not rotated in this clip; written as the sentinel float.
    Missing,
    /// The four quaternion component channels, in `x, y, z, w` order.
    Rotation(Vec<Vec<Keyframe>>),
}

/// A clip validated against the armature.
struct PreparedClip {
    block: MovementBlock,
    bones: Vec<BoneCurve>,
}

fn prepare_bone_curve(action: &ActionData, bone: &Bone, count: &mut KeyframeCount) -> Result<BoneCurve> {
    let Some(group) = action.bone_group(&bone.name) else {
        return Ok(BoneCurve::Missing);
    };
    let present: Vec<&[Keyframe]> = QuatComponent::ALL
        .iter()
        .filter_map(|c| group.get(&ChannelKey::Rotation(*c)).map(Vec::as_slice))
        .collect();

    match present.len() {
        0 => return Ok(BoneCurve::Missing),
        4 => {}
        found => {
            return Err(Error::IncompleteRotation {
                clip: action.name.clone(),
                bone: bone.name.clone(),
                found,
            })
        }
    }

    let counts: Vec<(String, usize)> = QuatComponent::ALL
        .iter()
        .zip(&present)
        .map(|(c, keys)| (format!("{}/{}", bone.name, ChannelKey::Rotation(*c)), keys.len()))
        .collect();
    count.check_all(&counts)?;
    if present.iter().all(|keys| keys.is_empty()) {
        return Ok(BoneCurve::Missing);
    }

    let curves: Vec<Vec<Keyframe>> = present.iter().map(|keys| sorted_keyframes(keys)).collect();
    // A curve starting at time 0.0 would read back as the "no curve" sentinel.
    if curves[0][0].time() == NO_BONE_CURVE {
        return Err(Error::ZeroTimeBoneKey { clip: action.name.clone(), bone: bone.name.clone() });
    }
    Ok(BoneCurve::Rotation(curves))
}

fn prepare_clip(
    action: &ActionData,
    armature: &ArmatureData,
    options: &ArmatureOptions,
) -> Result<PreparedClip> {
    let mut block = MovementBlock::prepare(action, &options.movement)?;
    let mut count = block.counter();
    let bones = armature
        .bones
        .iter()
        .map(|bone| prepare_bone_curve(action, bone, &mut count))
        .collect::<Result<Vec<_>>>()?;

    if block.keyframe_count().is_none() && count.canonical().is_some() {
        block.adopt_count(count);
    }
    Ok(PreparedClip { block, bones })
}

fn write_bone_records<W: Write>(enc: &mut BinaryEncoder<W>, armature: &ArmatureData) -> Result<()> {
    enc.write_u8(armature.num_bones() as u8)?;
    for bone in &armature.bones {
        enc.write_all_floats(&bone.direction.to_array())?;
        // Parent indices are < bone count <= 255, so index + 1 fits.
        enc.write_u8(bone.parent.map_or(0, |p| p as u8 + 1))?;
    }
    Ok(())
}

/// Validate and encode an armature file in memory.
///
/// `clips` are the clips associated with this armature by the host.
pub fn encode_armature(
    armature: &ArmatureData,
    clips: &[ActionData],
    options: &ArmatureOptions,
) -> Result<EncodedFile> {
    let start = Instant::now();
    armature.validate()?;
    check_count("bone", armature.num_bones(), MAX_U8)?;

    let prepared = clips
        .iter()
        .map(|clip| prepare_clip(clip, armature, options))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(
        bones = armature.num_bones(),
        clips = prepared.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "armature clips validated"
    );

    let mut warnings = Vec::new();
    let mut enc = BinaryEncoder::in_memory();
    enc.write_i32(FORMAT_VERSION)?;
    write_bone_records(&mut enc, armature)?;

    for (clip, source) in prepared.iter().zip(clips) {
        if clip.block.naming_fallback {
            warnings.push(ExportWarning::NamingFallback {
                source: source.name.clone(),
                stored: clip.block.name.clone(),
            });
        }
        clip.block.write(&mut enc)?;
        for (bone, curve) in armature.bones.iter().zip(&clip.bones) {
            match curve {
                BoneCurve::Missing => {
                    tracing::trace!(bone = %bone.name, "no rotation curve");
                    enc.write_f32(NO_BONE_CURVE)?;
                }
                BoneCurve::Rotation(curves) => {
                    for keys in curves {
                        encode_curve(&mut enc, keys)?;
                    }
                }
            }
        }
    }

    Ok(EncodedFile { bytes: enc.finish()?, warnings })
}

/// Export `armature` and its clips to `directory/name.sch3Darmature`.
pub fn export_armature(
    directory: impl AsRef<Path>,
    name: &str,
    armature: &ArmatureData,
    clips: &[ActionData],
    options: &ArmatureOptions,
) -> Result<ExportReport> {
    let file_name = format!("{}.{}", name, ARMATURE_EXTENSION);
    let _span = tracing::info_span!("export_armature", file = %file_name).entered();
    let encoded = encode_armature(armature, clips, options)?;
    let report = encoded.write_to(directory.as_ref(), &file_name)?;
    tracing::info!(
        armature = name,
        bones = armature.num_bones(),
        clips = clips.len(),
        bytes = report.bytes_written,
        "exported armature"
    );
    Ok(report)
}
