//! `.sch3Dmovements` reader and the shared movement block / curve parsing.

use std::path::Path;

use crate::anim::select_channels;
use crate::encoder::{
    MOVE_FLAG_LOCATION, MOVE_FLAG_ROTATION, MOVE_FLAG_SCALE_AXIS, MOVE_FLAG_SCALE_UNIFORM,
};
use crate::options::{MovementOptions, ScaleMode};
use crate::scene::{ChannelKey, Keyframe};
use crate::util::{Error, Result, Vec2};

use super::{load_file, BinaryDecoder};

/// One decoded movement block.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedMovement {
    pub name: String,
    /// `{location, rotation, uniform scale, axis scale}`.
    pub flags: [bool; 4],
    /// Keyframes per channel, `None` when the count byte is -1.
    pub keyframe_count: Option<usize>,
    /// Channels in file order. Boundary handles are `None`.
    pub channels: Vec<(ChannelKey, Vec<Keyframe>)>,
}

impl DecodedMovement {
    /// Get a channel by key.
    pub fn channel(&self, key: ChannelKey) -> Option<&[Keyframe]> {
        self.channels.iter().find(|(k, _)| *k == key).map(|(_, c)| c.as_slice())
    }
}

fn read_pair(dec: &mut BinaryDecoder<'_>) -> Result<Vec2> {
    Ok(Vec2::new(dec.read_f32()?, dec.read_f32()?))
}

/// Read one curve of `count` keyframes.
pub(crate) fn read_curve(dec: &mut BinaryDecoder<'_>, count: usize) -> Result<Vec<Keyframe>> {
    let mut keys = Vec::with_capacity(count);
    for i in 0..count {
        let handle_left = if i > 0 { Some(read_pair(dec)?) } else { None };
        let co = read_pair(dec)?;
        let handle_right = if i + 1 < count { Some(read_pair(dec)?) } else { None };
        keys.push(Keyframe { co, handle_left, handle_right });
    }
    Ok(keys)
}

/// Read one movement block.
pub(crate) fn read_movement(dec: &mut BinaryDecoder<'_>) -> Result<DecodedMovement> {
    let name = dec.read_string()?;
    let bits = dec.read_u8()?;
    let flags = [
        MOVE_FLAG_LOCATION,
        MOVE_FLAG_ROTATION,
        MOVE_FLAG_SCALE_UNIFORM,
        MOVE_FLAG_SCALE_AXIS,
    ]
    .map(|bit| bits & bit != 0);
    let scale = match (flags[2], flags[3]) {
        (false, false) => ScaleMode::None,
        (true, false) => ScaleMode::Uniform,
        (false, true) => ScaleMode::Axis,
        (true, true) => {
            return Err(Error::invalid(format!("clip '{}' sets both scale modes", name)))
        }
    };
    let count = dec.read_i8()?;
    let keyframe_count = usize::try_from(i32::from(count) + 1).ok().filter(|n| *n > 0);
    if count < -1 {
        return Err(Error::invalid(format!("clip '{}' has keyframe count byte {}", name, count)));
    }

    let options = MovementOptions { location: flags[0], rotation: flags[1], scale };
    let channels = select_channels(&options)
        .into_iter()
        .map(|key| Ok((key, read_curve(dec, keyframe_count.unwrap_or(0))?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(DecodedMovement { name, flags, keyframe_count, channels })
}

/// Decode a complete movements file.
pub fn decode_movements(data: &[u8]) -> Result<Vec<DecodedMovement>> {
    let mut dec = BinaryDecoder::new(data);
    dec.read_version()?;
    let mut clips = Vec::new();
    while !dec.is_empty() {
        clips.push(read_movement(&mut dec)?);
    }
    Ok(clips)
}

/// Read and decode a movements file from disk.
pub fn read_movements_file(path: impl AsRef<Path>) -> Result<Vec<DecodedMovement>> {
    decode_movements(&load_file(path)?)
}
