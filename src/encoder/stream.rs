//! Encoder stream.
//!
//! Field writers for the big-endian packed layout used by all three formats.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};

use crate::util::{Error, Result};

/// Append-only big-endian field writer.
///
/// Generic over the sink: the file writers encode into a `Vec<u8>` first so a
/// rejected export never touches the filesystem, then hand the bytes to
/// [`write_file`].
pub struct BinaryEncoder<W: Write = Vec<u8>> {
    writer: W,
    pos: u64,
}

impl BinaryEncoder<Vec<u8>> {
    /// Create an in-memory encoder.
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// Borrow the bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.writer
    }
}

impl BinaryEncoder<BufWriter<File>> {
    /// Create `directory/file_name`, creating the directory if absent.
    ///
    /// An existing file is truncated; nothing is ever appended across runs.
    pub fn create(directory: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        let path = prepare_target(directory.as_ref(), file_name)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BinaryEncoder<W> {
    /// Wrap an arbitrary sink.
    pub fn new(writer: W) -> Self {
        Self { writer, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Write a u8 value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.pos += 1;
        Ok(())
    }

    /// Write an i8 value.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.writer.write_i8(value)?;
        self.pos += 1;
        Ok(())
    }

    /// Write a u16 value (big-endian).
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.writer.write_u16::<BigEndian>(value)?;
        self.pos += 2;
        Ok(())
    }

    /// Write an i16 value (big-endian).
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.writer.write_i16::<BigEndian>(value)?;
        self.pos += 2;
        Ok(())
    }

    /// Write an i32 value (big-endian).
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.writer.write_i32::<BigEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    /// Write an f32 value (big-endian IEEE-754).
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.writer.write_f32::<BigEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    /// Write a UTF-8 string followed by a single zero byte.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        if value.as_bytes().contains(&0) {
            return Err(Error::invalid(format!("string {:?} contains a NUL byte", value)));
        }
        self.writer.write_all(value.as_bytes())?;
        self.writer.write_u8(0)?;
        self.pos += value.len() as u64 + 1;
        Ok(())
    }

    /// Pack booleans into `byte_count` bytes.
    ///
    /// Bit `i` of byte `b` is set iff `flags[8 * b + i]` is true. Bits past the
    /// end of `flags` are zero; flags past `8 * byte_count` are not written.
    pub fn write_flags(&mut self, flags: &[bool], byte_count: usize) -> Result<()> {
        for b in 0..byte_count {
            let byte = flags
                .iter()
                .skip(8 * b)
                .take(8)
                .enumerate()
                .filter(|(_, set)| **set)
                .fold(0u8, |acc, (i, _)| acc | (1 << i));
            self.write_u8(byte)?;
        }
        Ok(())
    }

    /// Write raw bytes as they are.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.pos += bytes.len() as u64;
        Ok(())
    }

    /// Write every float in order.
    pub fn write_all_floats(&mut self, values: &[f32]) -> Result<()> {
        for &v in values {
            self.write_f32(v)?;
        }
        Ok(())
    }

    /// Write every u16 in order.
    pub fn write_all_shorts(&mut self, values: &[u16]) -> Result<()> {
        for &v in values {
            self.write_u16(v)?;
        }
        Ok(())
    }

    /// Write every u16 pair as two consecutive shorts.
    pub fn write_all_short_pairs(&mut self, pairs: &[(u16, u16)]) -> Result<()> {
        for &(a, b) in pairs {
            self.write_u16(a)?;
            self.write_u16(b)?;
        }
        Ok(())
    }

    /// Flush buffered bytes to the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the sink.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

/// Create `directory` if needed and return the target path inside it.
fn prepare_target(directory: &Path, file_name: &str) -> Result<PathBuf> {
    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }
    Ok(directory.join(file_name))
}

/// Write a fully encoded payload to `directory/file_name`.
///
/// Truncates an existing file. Returns the written path.
pub fn write_file(directory: impl AsRef<Path>, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let directory = directory.as_ref();
    let mut enc = BinaryEncoder::create(directory, file_name)?;
    enc.write_bytes(bytes)?;
    enc.finish()?;
    Ok(directory.join(file_name))
}
