//! Animation clip input data.
//!
//! A clip holds object-level channels (location, quaternion rotation, scale)
//! and, for armatures, per-bone channel groups carrying the bone's rotation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::util::{Error, Vec2};

/// Cartesian axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Quaternion component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuatComponent {
    X,
    Y,
    Z,
    W,
}

impl QuatComponent {
    /// Export order of the rotation channels.
    pub const ALL: [QuatComponent; 4] =
        [QuatComponent::X, QuatComponent::Y, QuatComponent::Z, QuatComponent::W];

    fn as_str(self) -> &'static str {
        match self {
            QuatComponent::X => "x",
            QuatComponent::Y => "y",
            QuatComponent::Z => "z",
            QuatComponent::W => "w",
        }
    }
}

/// Key of one scalar animation channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelKey {
    Location(Axis),
    Rotation(QuatComponent),
    ScaleUniform,
    Scale(Axis),
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKey::Location(a) => write!(f, "location.{}", a.as_str()),
            ChannelKey::Rotation(c) => write!(f, "rotation.{}", c.as_str()),
            ChannelKey::ScaleUniform => f.write_str("scale.uniform"),
            ChannelKey::Scale(a) => write!(f, "scale.{}", a.as_str()),
        }
    }
}

impl FromStr for ChannelKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let axis = |c: &str| match c {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        };
        let parsed = match s.split_once('.') {
            Some(("location", c)) => axis(c).map(ChannelKey::Location),
            Some(("scale", "uniform")) => Some(ChannelKey::ScaleUniform),
            Some(("scale", c)) => axis(c).map(ChannelKey::Scale),
            Some(("rotation", c)) => match c {
                "x" => Some(QuatComponent::X),
                "y" => Some(QuatComponent::Y),
                "z" => Some(QuatComponent::Z),
                "w" => Some(QuatComponent::W),
                _ => None,
            }
            .map(ChannelKey::Rotation),
            _ => None,
        };
        parsed.ok_or_else(|| Error::invalid(format!("unknown channel key '{}'", s)))
    }
}

/// One keyframe: a (time, value) point plus optional tangent handles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    /// (time, value).
    pub co: Vec2,
    pub handle_left: Option<Vec2>,
    pub handle_right: Option<Vec2>,
}

impl Keyframe {
    /// Create a keyframe without handles.
    pub fn new(time: f32, value: f32) -> Self {
        Self { co: Vec2::new(time, value), handle_left: None, handle_right: None }
    }

    /// Set both tangent handles.
    pub fn with_handles(mut self, left: Vec2, right: Vec2) -> Self {
        self.handle_left = Some(left);
        self.handle_right = Some(right);
        self
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.co.x
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.co.y
    }

    /// Left handle, falling back to the keyframe point.
    #[inline]
    pub fn left(&self) -> Vec2 {
        self.handle_left.unwrap_or(self.co)
    }

    /// Right handle, falling back to the keyframe point.
    #[inline]
    pub fn right(&self) -> Vec2 {
        self.handle_right.unwrap_or(self.co)
    }
}

/// Channels of one owner (the animated object or one bone).
pub type ChannelMap = BTreeMap<ChannelKey, Vec<Keyframe>>;

/// A named animation clip.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionData {
    /// Source name, usually `<Owner>Action.<ClipName>`.
    pub name: String,
    /// Object-level channels.
    pub channels: ChannelMap,
    /// Channel groups keyed by bone name.
    pub bone_channels: BTreeMap<String, ChannelMap>,
}

impl ActionData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Add an object-level channel.
    pub fn with_channel(mut self, key: ChannelKey, keyframes: Vec<Keyframe>) -> Self {
        self.channels.insert(key, keyframes);
        self
    }

    /// Add a channel to a bone group.
    pub fn with_bone_channel(
        mut self,
        bone: impl Into<String>,
        key: ChannelKey,
        keyframes: Vec<Keyframe>,
    ) -> Self {
        self.bone_channels.entry(bone.into()).or_default().insert(key, keyframes);
        self
    }

    /// Get an object-level channel.
    pub fn channel(&self, key: ChannelKey) -> Option<&[Keyframe]> {
        self.channels.get(&key).map(Vec::as_slice)
    }

    /// Get the channel group of a bone.
    pub fn bone_group(&self, bone: &str) -> Option<&ChannelMap> {
        self.bone_channels.get(bone)
    }

    /// Check if any object-level channel is a quaternion rotation.
    pub fn has_quaternion(&self) -> bool {
        self.channels.keys().any(|k| matches!(k, ChannelKey::Rotation(_)))
    }
}
