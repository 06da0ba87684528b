//! Block Store Module
//!
//! Offset-addressed byte storage underneath the page manager.
//!
//! ## Responsibilities
//! - Read exactly `len` bytes at a byte offset
//! - Write bytes at a byte offset, growing the medium as needed
//! - Report the current size of the medium
//! - Release the underlying handle on close
//!
//! The store never interprets what it holds. Reads past the end of the
//! medium fail with `ReadFailure` (kind `UnexpectedEof`) in both
//! implementations.

mod file;
mod memory;

pub use file::FileBlockStore;
pub use memory::MemoryBlockStore;

use crate::error::Result;

/// Byte-addressable backing storage
pub trait BlockStore {
    /// Read exactly `len` bytes starting at `offset`
    fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>>;

    /// Write `bytes` starting at `offset`
    fn write(&mut self, offset: u64, bytes: &[u8]) -> Result<()>;

    /// Current size of the medium in bytes
    fn len(&self) -> Result<u64>;

    /// Returns true if nothing has been written yet
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Flush buffered writes to stable storage
    fn sync(&mut self) -> Result<()>;

    /// Release the underlying handle
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
