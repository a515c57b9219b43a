//! Clip-level encoding: naming, channel selection and the movement block.
//!
//! Movement block layout:
//!
//! ```text
//! name\0 | flags (u8) | keyframeCount - 1 (i8) | curve * channels
//! ```

use std::io::Write;

use crate::options::{MovementOptions, ScaleMode};
use crate::scene::{ActionData, Axis, ChannelKey, Keyframe, QuatComponent};
use crate::encoder::BinaryEncoder;
use crate::util::Result;

use super::curve::{encode_curve, sorted_keyframes, KeyframeCount};

/// Name stored in the file for a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipName<'a> {
    pub stored: &'a str,
    /// True when the source name had no `.` and was stored whole.
    pub fallback: bool,
}

/// Derive the stored clip name from a source name like `CubeAction.Walk`.
///
/// The part after the last `.` is kept; a name without `.` is kept whole.
pub fn clip_name(source: &str) -> ClipName<'_> {
    match source.rsplit_once('.') {
        Some((_, stored)) => ClipName { stored, fallback: false },
        None => ClipName { stored: source, fallback: true },
    }
}

/// Channels to export, in file order.
pub fn select_channels(options: &MovementOptions) -> Vec<ChannelKey> {
    let mut keys = Vec::with_capacity(10);
    if options.location {
        keys.extend(Axis::ALL.map(ChannelKey::Location));
    }
    if options.rotation {
        keys.extend(QuatComponent::ALL.map(ChannelKey::Rotation));
    }
    match options.scale {
        ScaleMode::None => {}
        ScaleMode::Uniform => keys.push(ChannelKey::ScaleUniform),
        ScaleMode::Axis => keys.extend(Axis::ALL.map(ChannelKey::Scale)),
    }
    keys
}

/// A validated movement block, ready to be written.
///
/// Validation happens in [`MovementBlock::prepare`], so a clip with
/// mismatched channels is rejected before any of its bytes are written.
#[derive(Clone, Debug)]
pub struct MovementBlock {
    /// Stored clip name.
    pub name: String,
    /// The source name had no `.` suffix.
    pub naming_fallback: bool,
    pub flags: [bool; 4],
    count: KeyframeCount,
    curves: Vec<(ChannelKey, Vec<Keyframe>)>,
}

impl MovementBlock {
    /// Select and validate the channels of `action`.
    pub fn prepare(action: &ActionData, options: &MovementOptions) -> Result<Self> {
        let name = clip_name(&action.name);
        if name.fallback {
            tracing::warn!(
                action = %action.name,
                stored = %name.stored,
                "clip name has no '.' suffix; storing the whole name"
            );
        }

        let keys = select_channels(options);
        let mut count = KeyframeCount::new(action.name.clone());
        let counts: Vec<(String, usize)> = keys
            .iter()
            .map(|k| (k.to_string(), action.channel(*k).map_or(0, <[Keyframe]>::len)))
            .collect();
        count.check_all(&counts)?;

        let curves = keys
            .iter()
            .map(|k| (*k, sorted_keyframes(action.channel(*k).unwrap_or_default())))
            .collect();

        Ok(Self {
            name: name.stored.to_string(),
            naming_fallback: name.fallback,
            flags: options.flags(),
            count,
            curves,
        })
    }

    /// Canonical keyframe count, `None` if no channel has keyframes.
    pub fn keyframe_count(&self) -> Option<usize> {
        self.count.canonical()
    }

    /// Count tracker to continue validating further curves of the same clip.
    pub fn counter(&self) -> KeyframeCount {
        self.count.clone()
    }

    /// Drop all channels and carry `count` instead.
    ///
    /// Used when the block itself has no keyframes but curves following it in
    /// the same clip do: the flags then announce no channels, and the count
    /// byte describes the following curves.
    pub(crate) fn adopt_count(&mut self, count: KeyframeCount) {
        self.flags = [false; 4];
        self.curves.clear();
        self.count = count;
    }

    /// Exported channels in file order.
    pub fn channels(&self) -> impl Iterator<Item = ChannelKey> + '_ {
        self.curves.iter().map(|(k, _)| *k)
    }

    /// Write the block.
    pub fn write<W: Write>(&self, enc: &mut BinaryEncoder<W>) -> Result<()> {
        enc.write_string(&self.name)?;
        enc.write_flags(&self.flags, 1)?;
        enc.write_i8(self.count.count_byte())?;
        for (key, keyframes) in &self.curves {
            tracing::trace!(channel = %key, keyframes = keyframes.len(), "write curve");
            encode_curve(enc, keyframes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::encoded_pair_count;
    use crate::util::Error;

    fn channel(n: usize) -> Vec<Keyframe> {
        (1..=n).map(|t| Keyframe::new(t as f32, 0.5)).collect()
    }

    fn walk(n: usize) -> ActionData {
        let mut action = ActionData::new("CharacterAction.Walk");
        for key in select_channels(&MovementOptions::default()) {
            action = action.with_channel(key, channel(n));
        }
        action
    }

    #[test]
    fn test_clip_name() {
        assert_eq!(clip_name("CharacterAction.Walk"), ClipName { stored: "Walk", fallback: false });
        assert_eq!(clip_name("Jump"), ClipName { stored: "Jump", fallback: true });
        assert_eq!(clip_name("Rig.Action.Run").stored, "Run");
    }

    #[test]
    fn test_channel_catalogue() {
        let all = select_channels(&MovementOptions::default());
        let names: Vec<String> = all.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            [
                "location.x", "location.y", "location.z",
                "rotation.x", "rotation.y", "rotation.z", "rotation.w",
                "scale.uniform",
            ]
        );

        let axis = select_channels(
            &MovementOptions::default().with_location(false).with_scale(ScaleMode::Axis),
        );
        assert_eq!(axis.len(), 7);
        assert_eq!(axis[4], ChannelKey::Scale(Axis::X));
        assert!(select_channels(
            &MovementOptions { location: false, rotation: false, scale: ScaleMode::None }
        )
        .is_empty());
    }

    #[test]
    fn test_block_layout() -> Result<()> {
        let block = MovementBlock::prepare(&walk(2), &MovementOptions::default())?;
        assert_eq!(block.keyframe_count(), Some(2));
        assert!(!block.naming_fallback);

        let mut enc = BinaryEncoder::in_memory();
        block.write(&mut enc)?;
        let bytes = enc.bytes();
        assert_eq!(&bytes[..5], b"Walk\0");
        assert_eq!(bytes[5], 0b0111);
        assert_eq!(bytes[6] as i8, 1);
        assert_eq!(bytes.len(), 7 + 8 * encoded_pair_count(2) * 8);
        Ok(())
    }

    #[test]
    fn test_unselected_channels_ignored() -> Result<()> {
        // Scale has a different count but is not exported.
        let action = walk(3).with_channel(ChannelKey::ScaleUniform, channel(1));
        let options = MovementOptions::default().with_scale(ScaleMode::None);
        let block = MovementBlock::prepare(&action, &options)?;
        assert_eq!(block.channels().count(), 7);
        assert_eq!(block.keyframe_count(), Some(3));
        Ok(())
    }

    #[test]
    fn test_mismatch_rejected() {
        let action = walk(3).with_channel(ChannelKey::Rotation(QuatComponent::Y), channel(2));
        let err = MovementBlock::prepare(&action, &MovementOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::CurveCountMismatch { ref clip, ref channel, expected: 3, actual: 2 }
                if clip == "CharacterAction.Walk" && channel == "rotation.y"
        ));
    }

    #[test]
    fn test_missing_channel_rejected() {
        let mut action = walk(2);
        action.channels.remove(&ChannelKey::Location(Axis::Z));
        let err = MovementBlock::prepare(&action, &MovementOptions::default()).unwrap_err();
        assert!(matches!(err, Error::CurveCountMismatch { actual: 0, .. }));
    }

    #[test]
    fn test_empty_clip() -> Result<()> {
        let block = MovementBlock::prepare(&ActionData::new("Jump"), &MovementOptions::default())?;
        assert!(block.naming_fallback);
        assert_eq!(block.name, "Jump");
        assert_eq!(block.keyframe_count(), None);

        let mut enc = BinaryEncoder::in_memory();
        block.write(&mut enc)?;
        assert_eq!(enc.bytes(), &[b'J', b'u', b'm', b'p', 0, 0b0111, 0xFF]);
        Ok(())
    }

    #[test]
    fn test_keyframes_written_in_time_order() -> Result<()> {
        let options = MovementOptions { location: true, rotation: false, scale: ScaleMode::None };
        let mut action = ActionData::new("A.B");
        for axis in Axis::ALL {
            action = action.with_channel(
                ChannelKey::Location(axis),
                vec![Keyframe::new(5.0, 1.0), Keyframe::new(2.0, 2.0)],
            );
        }
        let block = MovementBlock::prepare(&action, &options)?;
        let mut enc = BinaryEncoder::in_memory();
        block.write(&mut enc)?;
        // "B\0", flags, count, then the first point of location.x: time 2.0.
        assert_eq!(&enc.bytes()[4..8], &2.0f32.to_be_bytes());
        Ok(())
    }
}
