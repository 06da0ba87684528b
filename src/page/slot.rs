//! Slot entry codec
//!
//! A slot is a fixed 6-byte descriptor stored in the slot array at
//! `index * SLOT_ENTRY_SIZE`:
//!
//! ```text
//! ┌────────────┬────────────┬────────────┐
//! │ offset (2) │ length (2) │  flag (2)  │
//! └────────────┴────────────┴────────────┘
//! ```

use bytes::{Buf, BufMut};

/// Encoded size of one slot entry
pub const SLOT_ENTRY_SIZE: usize = 6;

/// Descriptor locating one record inside a page's data region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEntry {
    /// Start of the record within the data region
    pub offset: u16,
    /// Total encoded record size (length fields included)
    pub length: u16,
    /// 0 = active, anything else = logically deleted
    pub flag: u16,
}

impl SlotEntry {
    /// Flag value of a live record
    pub const ACTIVE: u16 = 0;

    /// Create an active slot
    pub fn new(offset: u16, length: u16) -> Self {
        Self {
            offset,
            length,
            flag: Self::ACTIVE,
        }
    }

    /// Returns true if the record has not been marked deleted
    pub fn is_active(&self) -> bool {
        self.flag == Self::ACTIVE
    }

    /// Decode from the first `SLOT_ENTRY_SIZE` bytes of `src`
    pub fn decode(mut src: &[u8]) -> Self {
        Self {
            offset: src.get_u16_le(),
            length: src.get_u16_le(),
            flag: src.get_u16_le(),
        }
    }

    /// Encode into the first `SLOT_ENTRY_SIZE` bytes of `dst`
    pub fn encode(&self, mut dst: &mut [u8]) {
        dst.put_u16_le(self.offset);
        dst.put_u16_le(self.length);
        dst.put_u16_le(self.flag);
    }

    /// One past the last byte of the record
    pub fn end(&self) -> usize {
        self.offset as usize + self.length as usize
    }
}
