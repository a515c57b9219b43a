//! Decoder stream over an in-memory file.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::encoder::FORMAT_VERSION;
use crate::util::{Error, Result};

/// Big-endian field reader.
pub struct BinaryDecoder<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(data) }
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.cursor.position()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.pos() as usize)
    }

    /// Check if all input has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn eof(&self, len: usize) -> Error {
        Error::UnexpectedEof(self.pos() + len as u64)
    }

    fn ensure(&self, len: usize) -> Result<()> {
        if self.remaining() < len {
            return Err(self.eof(len));
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.cursor.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<BigEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<BigEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.cursor.read_f32::<BigEndian>()?)
    }

    /// Read the next f32 without consuming it.
    pub fn peek_f32(&self) -> Result<f32> {
        self.ensure(4)?;
        let start = self.pos() as usize;
        let bytes = &self.cursor.get_ref()[start..start + 4];
        Ok(f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a NUL-terminated UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.pos() as usize;
        let data = self.cursor.get_ref();
        let len = data[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::UnexpectedEof(data.len() as u64))?;
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf)?;
        self.cursor.read_u8()?;
        Ok(String::from_utf8(buf)?)
    }

    /// Read one flag byte into eight booleans.
    pub fn read_flags(&mut self) -> Result<[bool; 8]> {
        let byte = self.read_u8()?;
        Ok(std::array::from_fn(|i| byte & (1 << i) != 0))
    }

    pub fn read_floats(&mut self, count: usize) -> Result<Vec<f32>> {
        self.ensure(count.saturating_mul(4))?;
        (0..count).map(|_| self.read_f32()).collect()
    }

    pub fn read_shorts(&mut self, count: usize) -> Result<Vec<u16>> {
        self.ensure(count.saturating_mul(2))?;
        (0..count).map(|_| self.read_u16()).collect()
    }

    /// Read and check the leading version marker.
    pub fn read_version(&mut self) -> Result<i32> {
        let version = self.read_i32()?;
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        Ok(version)
    }

    /// Fail if unread bytes remain.
    pub fn expect_end(&self) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::invalid(format!(
                "{} trailing bytes at position {}",
                self.remaining(),
                self.pos()
            )));
        }
        Ok(())
    }
}
