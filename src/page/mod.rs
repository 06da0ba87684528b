//! Page Module
//!
//! Fixed-size slotted pages holding variable-length key/value records.
//!
//! ## Page Layout (4096 bytes)
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┐
//! │ PageId (8)   │ Count (4)    │ FreeSpace (2)│ DataStart (2)│  header, bytes 0-15
//! ├──────────────┴──────────────┴──────────────┴──────────────┤
//! │ Slot 0 │ Slot 1 │ ... │ Slot N-1 │ ──▶                    │  data region,
//! │                                                           │  bytes 16-4095
//! │                  free space                               │
//! │                                                           │
//! │                ◀── │ Record N-1 │ ... │ Record 1 │Record 0│
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Slots grow upward from offset 0 of the data region, records grow
//! downward from its top. `data_start` is the lowest byte already used by a
//! record, and `free_space == data_start - count * SLOT_ENTRY_SIZE`.

mod record;
mod slot;

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{PageKvError, Result};

pub use record::{record_size, MAX_KEY_SIZE, MAX_VALUE_SIZE, RECORD_HEADER_SIZE};
pub use slot::{SlotEntry, SLOT_ENTRY_SIZE};

use record::{decode_record, encode_record};

// =============================================================================
// Layout Constants
// =============================================================================

/// Size of every page on disk
pub const PAGE_SIZE: usize = 4096;

/// PageId (8) + Count (4) + FreeSpace (2) + DataStart (2)
pub const HEADER_SIZE: usize = 16;

/// Bytes available for slots and records
pub const DATA_REGION_SIZE: usize = PAGE_SIZE - HEADER_SIZE;

/// Page id reserved for database metadata
pub const META_PAGE_ID: u64 = 0;

/// Byte offset of a page in the backing store, `None` if it would not fit in a u64
pub fn page_offset(page_id: u64) -> Option<u64> {
    let offset = page_id.checked_mul(PAGE_SIZE as u64)?;
    offset.checked_add(PAGE_SIZE as u64)?;
    Some(offset)
}

// =============================================================================
// Page
// =============================================================================

/// In-memory image of one slotted page
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    page_id: u64,
    record_count: u32,
    free_space: u16,
    data_start: u16,
    data: Box<[u8; DATA_REGION_SIZE]>,
}

impl Page {
    /// Create an empty page
    pub fn new(page_id: u64) -> Self {
        Self {
            page_id,
            record_count: 0,
            free_space: DATA_REGION_SIZE as u16,
            data_start: DATA_REGION_SIZE as u16,
            data: Box::new([0u8; DATA_REGION_SIZE]),
        }
    }

    // =========================================================================
    // Slot Array
    // =========================================================================

    /// Decode slot `index` (caller keeps `index < record_count`)
    pub fn slot(&self, index: usize) -> SlotEntry {
        debug_assert!(index < self.record_count as usize);
        let pos = index * SLOT_ENTRY_SIZE;
        SlotEntry::decode(&self.data[pos..pos + SLOT_ENTRY_SIZE])
    }

    /// Overwrite slot `index` in place
    pub fn set_slot(&mut self, index: usize, entry: SlotEntry) {
        let pos = index * SLOT_ENTRY_SIZE;
        entry.encode(&mut self.data[pos..pos + SLOT_ENTRY_SIZE]);
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Append a record below the lowest existing one
    ///
    /// Fails with `KeyTooLarge`/`ValueTooLarge` on oversize input and with
    /// `InsufficientSpace` when the record plus its slot do not fit. The page
    /// is left untouched on failure.
    pub fn write_record(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        check_sizes(key, value)?;

        let size = record_size(key.len(), value.len());
        let needed = size + SLOT_ENTRY_SIZE;
        if (self.free_space as usize) < needed {
            return Err(PageKvError::InsufficientSpace {
                needed,
                available: self.free_space as usize,
            });
        }

        let data_start = if self.record_count == 0 {
            DATA_REGION_SIZE
        } else {
            self.data_start as usize
        };

        // Slot array and records must never overlap
        let slots_end = (self.record_count as usize + 1) * SLOT_ENTRY_SIZE;
        let new_data_start = match data_start.checked_sub(size) {
            Some(start) if start >= slots_end => start,
            _ => {
                return Err(PageKvError::InsufficientSpace {
                    needed,
                    available: data_start.saturating_sub(slots_end - SLOT_ENTRY_SIZE),
                })
            }
        };

        encode_record(&mut self.data[new_data_start..data_start], key, value);

        let index = self.record_count as usize;
        self.set_slot(index, SlotEntry::new(new_data_start as u16, size as u16));

        self.data_start = new_data_start as u16;
        self.record_count += 1;
        self.free_space -= needed as u16;

        Ok(())
    }

    /// Value of the first active record whose key equals `key`
    ///
    /// Slots are scanned from index 0, so with duplicate keys the oldest
    /// record wins.
    pub fn read_record(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        for entry in self.records() {
            let (record_key, value) = entry?;
            if record_key == key {
                return Ok(Some(value.to_vec()));
            }
        }
        Ok(None)
    }

    /// Iterate active records in slot order
    pub fn records(&self) -> Records<'_> {
        Records {
            page: self,
            index: 0,
        }
    }

    /// True if a record of `record_size` bytes and its slot entry fit
    pub fn has_space(&self, record_size: usize) -> bool {
        self.free_space as usize >= record_size + SLOT_ENTRY_SIZE
    }

    /// Decode the record behind `slot`, validating its extent
    fn record_at(&self, slot: SlotEntry) -> Result<(&[u8], &[u8])> {
        let slots_end = self.record_count as usize * SLOT_ENTRY_SIZE;
        if (slot.offset as usize) < slots_end || slot.end() > DATA_REGION_SIZE {
            return Err(PageKvError::corrupt(
                self.page_id,
                format!(
                    "slot [{}, {}) outside record region [{}, {})",
                    slot.offset,
                    slot.end(),
                    slots_end,
                    DATA_REGION_SIZE
                ),
            ));
        }

        decode_record(&self.data[slot.offset as usize..slot.end()]).ok_or_else(|| {
            PageKvError::corrupt(
                self.page_id,
                format!(
                    "record at offset {} disagrees with slot length {}",
                    slot.offset, slot.length
                ),
            )
        })
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Encode header + data region into a full page image
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PAGE_SIZE);
        buf.put_u64_le(self.page_id);
        buf.put_u32_le(self.record_count);
        buf.put_u16_le(self.free_space);
        buf.put_u16_le(self.data_start);
        buf.put_slice(&self.data[..]);
        buf
    }

    /// Decode a full page image, rejecting inconsistent headers
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PAGE_SIZE {
            return Err(PageKvError::corrupt(
                META_PAGE_ID,
                format!("page image is {} bytes, expected {}", bytes.len(), PAGE_SIZE),
            ));
        }

        let mut header = &bytes[..HEADER_SIZE];
        let page_id = header.get_u64_le();
        let record_count = header.get_u32_le();
        let free_space = header.get_u16_le();
        let data_start = header.get_u16_le();

        check_header(page_id, record_count, free_space, data_start)?;

        let mut data = Box::new([0u8; DATA_REGION_SIZE]);
        data.copy_from_slice(&bytes[HEADER_SIZE..]);

        Ok(Self {
            page_id,
            record_count,
            free_space,
            data_start,
            data,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    /// Number of allocated slots (deleted ones included)
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    pub fn free_space(&self) -> u16 {
        self.free_space
    }

    pub fn data_start(&self) -> u16 {
        self.data_start
    }

    /// Raw data region (slot array + records)
    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("page_id", &self.page_id)
            .field("record_count", &self.record_count)
            .field("free_space", &self.free_space)
            .field("data_start", &self.data_start)
            .finish_non_exhaustive()
    }
}

/// Reject keys or values over the per-record limits
pub(crate) fn check_sizes(key: &[u8], value: &[u8]) -> Result<()> {
    if key.len() > MAX_KEY_SIZE {
        return Err(PageKvError::KeyTooLarge {
            len: key.len(),
            max: MAX_KEY_SIZE,
        });
    }
    if value.len() > MAX_VALUE_SIZE {
        return Err(PageKvError::ValueTooLarge {
            len: value.len(),
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(())
}

/// Header consistency rules for a decoded page
///
/// An empty page may carry `data_start == 0` (never written) or the top of
/// the region; either way all of the region must be free.
fn check_header(page_id: u64, record_count: u32, free_space: u16, data_start: u16) -> Result<()> {
    let data_start = data_start as usize;
    let free_space = free_space as usize;

    if data_start > DATA_REGION_SIZE {
        return Err(PageKvError::corrupt(
            page_id,
            format!("data_start {} beyond data region {}", data_start, DATA_REGION_SIZE),
        ));
    }

    if record_count == 0 {
        if free_space != DATA_REGION_SIZE {
            return Err(PageKvError::corrupt(
                page_id,
                format!("empty page reports free_space {}", free_space),
            ));
        }
        return Ok(());
    }

    let slots_end = (record_count as usize).saturating_mul(SLOT_ENTRY_SIZE);
    if slots_end > data_start {
        return Err(PageKvError::corrupt(
            page_id,
            format!("{} slots overlap records starting at {}", record_count, data_start),
        ));
    }

    if free_space != data_start - slots_end {
        return Err(PageKvError::corrupt(
            page_id,
            format!(
                "free_space {} != data_start {} - {} slot bytes",
                free_space, data_start, slots_end
            ),
        ));
    }

    Ok(())
}

// =============================================================================
// Record Iterator
// =============================================================================

/// Iterator over the active records of a page, in slot order
pub struct Records<'a> {
    page: &'a Page,
    index: usize,
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<(&'a [u8], &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.page.record_count as usize {
            let slot = self.page.slot(self.index);
            self.index += 1;

            // Deleted slots keep their bytes but are invisible
            if !slot.is_active() {
                continue;
            }
            return Some(self.page.record_at(slot));
        }
        None
    }
}
