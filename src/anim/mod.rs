//! Keyframe curve encoding.
//!
//! A curve of N keyframes is stored as a run of (time, value) float pairs:
//!
//! ```text
//! k0 R0 | L1 k1 R1 | ... | L(n-1) k(n-1)
//! ```
//!
//! The left handle of the first keyframe and the right handle of the last one
//! are omitted, so N keyframes take `3N - 2` pairs (one pair for N = 1).

pub mod curve;
pub mod clip;

pub use curve::{curve_pairs, encode_curve, encoded_pair_count, sorted_keyframes, KeyframeCount};
pub use clip::{clip_name, select_channels, ClipName, MovementBlock};
