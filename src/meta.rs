//! Database metadata
//!
//! Page-id allocation counters, persisted at the start of page 0:
//!
//! ```text
//! ┌────────────────┬────────────────┬────────────────┬──────────────────┐
//! │ NextPageId (8) │ PageCount (8)  │ LastPageId (8) │ zero padding ... │
//! └────────────────┴────────────────┴────────────────┴──────────────────┘
//! ```

use bytes::{Buf, BufMut};

use crate::error::{PageKvError, Result};
use crate::page::{page_offset, META_PAGE_ID, PAGE_SIZE};

/// Encoded size of the three counters
pub const META_SIZE: usize = 24;

/// Allocation state of a database file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseMeta {
    /// Id handed to the next created page
    pub next_page_id: u64,
    /// Pages created so far
    pub page_count: u64,
    /// Highest allocated id; scans cover `1..=last_page_id` (0 = no data pages)
    pub last_page_id: u64,
}

impl DatabaseMeta {
    /// Metadata of a database without data pages
    pub fn new() -> Self {
        Self {
            next_page_id: META_PAGE_ID + 1,
            page_count: 0,
            last_page_id: 0,
        }
    }

    /// Reserve the next page id
    ///
    /// Returns the updated metadata and the allocated id. Fails with
    /// `NoSpaceAvailable` once page offsets would overflow the address space.
    pub fn allocate(self) -> Result<(Self, u64)> {
        let page_id = self.next_page_id;
        let next_page_id = page_id.checked_add(1).ok_or(PageKvError::NoSpaceAvailable)?;
        let page_count = self
            .page_count
            .checked_add(1)
            .ok_or(PageKvError::NoSpaceAvailable)?;
        page_offset(page_id).ok_or(PageKvError::NoSpaceAvailable)?;

        let next = Self {
            next_page_id,
            page_count,
            last_page_id: page_id,
        };
        Ok((next, page_id))
    }

    /// Data page ids covered by scans, ascending
    pub fn data_page_ids(&self) -> std::ops::RangeInclusive<u64> {
        (META_PAGE_ID + 1)..=self.last_page_id
    }

    /// Encode into a full page-0 image
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PAGE_SIZE);
        buf.put_u64_le(self.next_page_id);
        buf.put_u64_le(self.page_count);
        buf.put_u64_le(self.last_page_id);
        buf.resize(PAGE_SIZE, 0);
        buf
    }

    /// Decode from a page-0 image (only the first `META_SIZE` bytes matter)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < META_SIZE {
            return Err(PageKvError::corrupt(
                META_PAGE_ID,
                format!("metadata needs {} bytes, got {}", META_SIZE, bytes.len()),
            ));
        }

        let mut src = &bytes[..META_SIZE];
        let meta = Self {
            next_page_id: src.get_u64_le(),
            page_count: src.get_u64_le(),
            last_page_id: src.get_u64_le(),
        };

        if meta.next_page_id == META_PAGE_ID || meta.last_page_id >= meta.next_page_id {
            return Err(PageKvError::corrupt(
                META_PAGE_ID,
                format!(
                    "next_page_id {} must exceed last_page_id {} and 0",
                    meta.next_page_id, meta.last_page_id
                ),
            ));
        }

        // Every created page gets a fresh id, so the count cannot outrun it
        if meta.page_count > meta.last_page_id {
            return Err(PageKvError::corrupt(
                META_PAGE_ID,
                format!(
                    "page_count {} exceeds last_page_id {}",
                    meta.page_count, meta.last_page_id
                ),
            ));
        }

        Ok(meta)
    }
}

impl Default for DatabaseMeta {
    fn default() -> Self {
        Self::new()
    }
}
