//! Export options.
//!
//! Feature flags gating the optional sections of each format. All options
//! default to exporting every channel with uniform scale.

/// How scale channels are exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleMode {
    /// No scale channels.
    None,
    /// One `scale.uniform` channel.
    #[default]
    Uniform,
    /// Three `scale.x/y/z` channels.
    Axis,
}

/// Channels exported for a clip's object-level movement block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementOptions {
    pub location: bool,
    pub rotation: bool,
    pub scale: ScaleMode,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self { location: true, rotation: true, scale: ScaleMode::Uniform }
    }
}

impl MovementOptions {
    /// Enable or disable the location channels.
    pub fn with_location(mut self, location: bool) -> Self {
        self.location = location;
        self
    }

    /// Enable or disable the rotation channels.
    pub fn with_rotation(mut self, rotation: bool) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale mode.
    pub fn with_scale(mut self, scale: ScaleMode) -> Self {
        self.scale = scale;
        self
    }

    /// Flag word `{location, rotation, uniform scale, axis scale}`.
    pub fn flags(&self) -> [bool; 4] {
        [
            self.location,
            self.rotation,
            self.scale == ScaleMode::Uniform,
            self.scale == ScaleMode::Axis,
        ]
    }
}

/// Optional sections of the mesh format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeshOptions {
    /// Write seam doubles and per-vertex UVs.
    pub textured: bool,
    /// Write per-vertex skin records.
    pub armature_indexed: bool,
}

impl MeshOptions {
    pub fn with_textured(mut self, textured: bool) -> Self {
        self.textured = textured;
        self
    }

    pub fn with_armature_indexed(mut self, armature_indexed: bool) -> Self {
        self.armature_indexed = armature_indexed;
        self
    }
}

/// Options of the armature format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArmatureOptions {
    /// Channels of the armature object's own movement block per clip.
    pub movement: MovementOptions,
}

impl ArmatureOptions {
    pub fn with_movement(mut self, movement: MovementOptions) -> Self {
        self.movement = movement;
        self
    }
}
