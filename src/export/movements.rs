//! `.sch3Dmovements` writer.
//!
//! ```text
//! version (i32) | movement block * clips
//! ```

use std::path::Path;

use crate::anim::MovementBlock;
use crate::encoder::{BinaryEncoder, FORMAT_VERSION, MOVEMENTS_EXTENSION};
use crate::options::MovementOptions;
use crate::scene::ActionData;
use crate::util::Result;

use super::report::{EncodedFile, ExportReport, ExportWarning};

/// Validate and encode a movements file in memory.
///
/// Every clip is validated before the first byte is encoded, so one bad clip
/// rejects the whole file.
pub fn encode_movements(clips: &[ActionData], options: &MovementOptions) -> Result<EncodedFile> {
    let blocks = clips
        .iter()
        .map(|clip| MovementBlock::prepare(clip, options))
        .collect::<Result<Vec<_>>>()?;

    let mut warnings = Vec::new();
    let mut enc = BinaryEncoder::in_memory();
    enc.write_i32(FORMAT_VERSION)?;
    for (block, source) in blocks.iter().zip(clips) {
        if block.naming_fallback {
            warnings.push(ExportWarning::NamingFallback {
                source: source.name.clone(),
                stored: block.name.clone(),
            });
        }
        tracing::debug!(
            clip = %block.name,
            keyframes = block.keyframe_count().unwrap_or(0),
            "write movement"
        );
        block.write(&mut enc)?;
    }

    Ok(EncodedFile { bytes: enc.finish()?, warnings })
}

/// Export the clips of one object to `directory/name.sch3Dmovements`.
pub fn export_movements(
    directory: impl AsRef<Path>,
    name: &str,
    clips: &[ActionData],
    options: &MovementOptions,
) -> Result<ExportReport> {
    let file_name = format!("{}.{}", name, MOVEMENTS_EXTENSION);
    let _span = tracing::info_span!("export_movements", file = %file_name).entered();
    let encoded = encode_movements(clips, options)?;
    let report = encoded.write_to(directory.as_ref(), &file_name)?;
    tracing::info!(
        object = name,
        clips = clips.len(),
        bytes = report.bytes_written,
        "exported movements"
    );
    Ok(report)
}
