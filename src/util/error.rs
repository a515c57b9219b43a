//! Error types for the sch3d exporter.

use thiserror::Error;

/// Main error type for export and decode operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Polygons of a mesh do not share one arity
    #[error("Mixed polygon arity: polygon {polygon} has {actual} corners, expected {expected}")]
    MixedArity { polygon: usize, expected: usize, actual: usize },

    /// Polygon arity other than triangles or quads
    #[error("Unsupported polygon arity {0} (only 3 or 4)")]
    UnsupportedArity(usize),

    /// A count does not fit the width the format reserves for it
    #[error("{what} count {count} exceeds format limit {limit}")]
    CountOverflow { what: &'static str, count: usize, limit: usize },

    /// An index points outside the array it refers to
    #[error("{what} index {index} out of range (count: {count})")]
    IndexOutOfRange { what: &'static str, index: usize, count: usize },

    /// Vertex group carries weight but names no exported bone
    #[error("Vertex group '{0}' has no bone in the exported armature")]
    UnboundBoneGroup(String),

    /// A kept bone's parent was dropped from the exported bone list
    #[error("Bone '{bone}' is parented to '{parent}', which has no influenced vertices")]
    DroppedParent { bone: String, parent: String },

    /// Parent relation is not a forest
    #[error("Bone '{0}' has an invalid parent (cycle or self reference)")]
    InvalidParent(String),

    /// Textured export requested for a mesh without UVs
    #[error("Mesh has no UV layer (or wrong corner count) but textured export was requested")]
    MissingUvs,

    /// Armature-indexed export requested for a mesh without weights
    #[error("Mesh has no vertex weights (or wrong vertex count) but armature-indexed export was requested")]
    MissingWeights,

    /// Bone group carries only some quaternion components
    #[error("Bone '{bone}' in clip '{clip}' has {found} of 4 rotation channels")]
    IncompleteRotation { clip: String, bone: String, found: usize },

    /// Bone rotation curve starts at time zero, colliding with the "no curve" sentinel
    #[error("Bone '{bone}' in clip '{clip}' has a keyframe at time 0.0")]
    ZeroTimeBoneKey { clip: String, bone: String },

    /// Channels of one clip disagree on keyframe count
    #[error("Number of keyframes is not uniform for clip '{clip}': {channel} has {actual}, expected {expected}")]
    CurveCountMismatch {
        clip: String,
        channel: String,
        expected: usize,
        actual: usize,
    },

    /// Decoded file is truncated
    #[error("Unexpected end of data at position {0}")]
    UnexpectedEof(u64),

    /// Decoded file carries an unknown version marker
    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(i32),

    /// Invalid data structure in a decoded file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Check if this error is a rejected input precondition.
    ///
    /// Precondition errors are raised before any byte of the file is written.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MixedArity { .. }
                | Self::UnsupportedArity(_)
                | Self::CountOverflow { .. }
                | Self::IndexOutOfRange { .. }
                | Self::UnboundBoneGroup(_)
                | Self::DroppedParent { .. }
                | Self::InvalidParent(_)
                | Self::MissingUvs
                | Self::MissingWeights
                | Self::IncompleteRotation { .. }
                | Self::ZeroTimeBoneKey { .. }
        )
    }
}

/// Result type alias for sch3d operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that `count` fits in a field whose maximum value is `limit`.
pub(crate) fn check_count(what: &'static str, count: usize, limit: usize) -> Result<()> {
    if count > limit {
        return Err(Error::CountOverflow { what, count, limit });
    }
    Ok(())
}
