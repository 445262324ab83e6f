//! Whole-file input for the file helpers and the CLI.
//!
//! Regular files are memory-mapped so the codec reads straight from the page
//! cache. Empty files cannot be mapped on every platform and are held as an
//! empty slice instead.

use crate::error::Result;
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;

/// Read-only view of a file's contents
#[derive(Debug)]
pub struct InputSource {
    mmap: Option<Mmap>,
}

impl InputSource {
    /// Map the file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(&file)
    }

    /// Map an already-open file
    pub fn from_file(file: &File) -> Result<Self> {
        if file.metadata()?.len() == 0 {
            return Ok(Self { mmap: None });
        }
        // SAFETY: the mapping is read-only; the file must not be truncated or
        // modified by another process while this source is alive.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap: Some(mmap) })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Deref for InputSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for InputSource {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
