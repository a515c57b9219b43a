//! Single channel encoding and clip-wide keyframe count tracking.

use std::io::Write;

use crate::encoder::{BinaryEncoder, MAX_KEYFRAMES};
use crate::scene::Keyframe;
use crate::util::{check_count, Error, Result, Vec2};

/// Keyframes in time order (stable for equal times).
pub fn sorted_keyframes(keyframes: &[Keyframe]) -> Vec<Keyframe> {
    let mut sorted = keyframes.to_vec();
    sorted.sort_by(|a, b| a.time().total_cmp(&b.time()));
    sorted
}

/// Points emitted for a time-ordered channel, handles omitted at the ends.
pub fn curve_pairs(keyframes: &[Keyframe]) -> Vec<Vec2> {
    let last = keyframes.len().saturating_sub(1);
    let mut pairs = Vec::with_capacity(encoded_pair_count(keyframes.len()));
    for (i, key) in keyframes.iter().enumerate() {
        if i > 0 {
            pairs.push(key.left());
        }
        pairs.push(key.co);
        if i < last {
            pairs.push(key.right());
        }
    }
    pairs
}

/// Number of (time, value) pairs a channel of `n` keyframes encodes to.
#[inline]
pub const fn encoded_pair_count(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        3 * n - 2
    }
}

/// Write a time-ordered channel.
pub fn encode_curve<W: Write>(enc: &mut BinaryEncoder<W>, keyframes: &[Keyframe]) -> Result<()> {
    for p in curve_pairs(keyframes) {
        enc.write_f32(p.x)?;
        enc.write_f32(p.y)?;
    }
    Ok(())
}

/// Canonical keyframe count of one clip.
///
/// The first channel with keyframes fixes the count; every channel checked
/// afterwards must match it.
#[derive(Clone, Debug)]
pub struct KeyframeCount {
    clip: String,
    canonical: Option<usize>,
}

impl KeyframeCount {
    pub fn new(clip: impl Into<String>) -> Self {
        Self { clip: clip.into(), canonical: None }
    }

    /// The fixed count, if any channel has keyframes yet.
    pub fn canonical(&self) -> Option<usize> {
        self.canonical
    }

    /// Fix the count from `n` if unset, otherwise compare against it.
    pub fn check(&mut self, channel: &str, n: usize) -> Result<()> {
        match self.canonical {
            Some(expected) if expected != n => Err(self.mismatch(channel, expected, n)),
            Some(_) => Ok(()),
            None if n == 0 => Ok(()),
            None => {
                check_count("keyframe", n, MAX_KEYFRAMES)?;
                self.canonical = Some(n);
                Ok(())
            }
        }
    }

    /// Check a group of channels at once.
    ///
    /// The first nonempty channel fixes the count; afterwards every channel of
    /// the group, including empty ones listed before it, must match.
    pub fn check_all(&mut self, channels: &[(String, usize)]) -> Result<()> {
        for (name, n) in channels {
            self.check(name, *n)?;
        }
        if let Some(expected) = self.canonical {
            if let Some((name, n)) = channels.iter().find(|(_, n)| *n != expected) {
                return Err(self.mismatch(name, expected, *n));
            }
        }
        Ok(())
    }

    /// Value of the count byte: `count - 1`, or -1 when no channel has keyframes.
    pub fn count_byte(&self) -> i8 {
        // canonical <= MAX_KEYFRAMES, so count - 1 fits i8.
        self.canonical.map_or(-1, |n| (n - 1) as i8)
    }

    fn mismatch(&self, channel: &str, expected: usize, actual: usize) -> Error {
        Error::CurveCountMismatch {
            clip: self.clip.clone(),
            channel: channel.to_string(),
            expected,
            actual,
        }
    }
}
