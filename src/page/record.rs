//! Record codec
//!
//! ```text
//! ┌─────────────┬───────────────┬─────────┬───────────┐
//! │ KeyLen (2)  │ ValueLen (2)  │   Key   │   Value   │
//! └─────────────┴───────────────┴─────────┴───────────┘
//! ```

use bytes::{Buf, BufMut};

/// Size of the two length fields in front of every record
pub const RECORD_HEADER_SIZE: usize = 4;

/// Largest key accepted by a page
pub const MAX_KEY_SIZE: usize = 400;

/// Largest value accepted by a page
pub const MAX_VALUE_SIZE: usize = 400;

/// Encoded size of a record holding `key_len` + `value_len` bytes
pub fn record_size(key_len: usize, value_len: usize) -> usize {
    RECORD_HEADER_SIZE + key_len + value_len
}

/// Encode a record at the start of `dst`
///
/// `dst` must hold at least `record_size(key.len(), value.len())` bytes and
/// both lengths must fit in a u16 (callers enforce the size limits).
pub(crate) fn encode_record(mut dst: &mut [u8], key: &[u8], value: &[u8]) {
    dst.put_u16_le(key.len() as u16);
    dst.put_u16_le(value.len() as u16);
    dst.put_slice(key);
    dst.put_slice(value);
}

/// Decode a record occupying exactly `src`
///
/// Returns `None` when the length fields disagree with the slot length.
pub(crate) fn decode_record(src: &[u8]) -> Option<(&[u8], &[u8])> {
    if src.len() < RECORD_HEADER_SIZE {
        return None;
    }

    let mut header = &src[..RECORD_HEADER_SIZE];
    let key_len = header.get_u16_le() as usize;
    let value_len = header.get_u16_le() as usize;

    if record_size(key_len, value_len) != src.len() {
        return None;
    }

    let body = &src[RECORD_HEADER_SIZE..];
    Some(body.split_at(key_len))
}
