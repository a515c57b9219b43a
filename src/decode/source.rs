//! File loading for the decoders.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

use crate::util::{Error, Result};

/// Contents of a file opened for decoding.
pub enum FileData {
    /// Memory-mapped file
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
    /// Whole file read into memory
    Buffered(Vec<u8>),
}

impl Deref for FileData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            FileData::Mapped(mmap) => &mmap[..],
            FileData::Buffered(data) => data.as_slice(),
        }
    }
}

/// Open a file for decoding, memory mapped when the `mmap` feature is enabled.
pub fn load_file(path: impl AsRef<Path>) -> Result<FileData> {
    let file = File::open(path.as_ref())?;
    let size = file.metadata()?.len();
    if size == 0 {
        return Err(Error::UnexpectedEof(0));
    }
    load(file)
}

#[cfg(feature = "mmap")]
fn load(file: File) -> Result<FileData> {
    // Safety: the file is opened read-only and the mapping is only read.
    let mmap = unsafe { Mmap::map(&file) }?;
    Ok(FileData::Mapped(mmap))
}

#[cfg(not(feature = "mmap"))]
fn load(mut file: File) -> Result<FileData> {
    use std::io::Read;

    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(FileData::Buffered(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_file() -> Result<()> {
        let temp = NamedTempFile::new()?;
        assert!(matches!(load_file(temp.path()), Err(Error::UnexpectedEof(0))));

        std::fs::write(temp.path(), [0, 0, 0, 1, 7])?;
        let data = load_file(temp.path())?;
        assert_eq!(&data[..], &[0, 0, 0, 1, 7]);
        #[cfg(feature = "mmap")]
        assert!(matches!(data, FileData::Mapped(_)));
        Ok(())
    }
}
