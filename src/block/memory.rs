//! In-memory block store
//!
//! Behaves like a sparse file: writes past the end zero-fill the gap and
//! reads past the end fail.

use std::io;

use crate::error::{PageKvError, Result};

use super::BlockStore;

/// Block store backed by a growable byte vector
#[derive(Debug, Default, Clone)]
pub struct MemoryBlockStore {
    data: Vec<u8>,
}

impl MemoryBlockStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing image (e.g. bytes copied from a database file)
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Raw contents of the store
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw contents (for corrupting pages in tests)
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl BlockStore for MemoryBlockStore {
    fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(self.data[start..end].to_vec()),
            _ => Err(PageKvError::ReadFailure {
                offset,
                len,
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of store"),
            }),
        }
    }

    fn write(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        let start = offset as usize;
        let end = start
            .checked_add(bytes.len())
            .ok_or_else(|| PageKvError::WriteFailure {
                offset,
                len: bytes.len(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "offset overflow"),
            })?;

        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(bytes);

        Ok(())
    }

    fn len(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}
