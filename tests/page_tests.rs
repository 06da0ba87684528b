//! Tests for Page
//!
//! These tests verify:
//! - Write/read round trips across the whole key and value size range
//! - Space accounting under mixed record sizes
//! - Page image encode/decode stability

use pagekv::page::{record_size, Page, DATA_REGION_SIZE, SLOT_ENTRY_SIZE};
use pagekv::PageKvError;

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_every_key_and_value_length_round_trips() {
    for len in 1..=400usize {
        let key = vec![(len % 251) as u8; len];
        let value: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();

        let mut page = Page::new(1);
        page.write_record(&key, &value).unwrap();

        assert_eq!(page.read_record(&key).unwrap(), Some(value), "length {len}");
    }
}

#[test]
fn test_image_round_trip_after_mixed_writes() {
    let mut page = Page::new(42);
    let mut i = 0usize;
    loop {
        let key = format!("key{i}");
        let value = vec![b'a' + (i % 26) as u8; (i * 37) % 300];
        if page.write_record(key.as_bytes(), &value).is_err() {
            break;
        }
        i += 1;
    }

    let decoded = Page::from_bytes(&page.to_bytes()).unwrap();

    assert_eq!(decoded.page_id(), 42);
    assert_eq!(decoded.record_count(), page.record_count());
    assert_eq!(decoded.free_space(), page.free_space());
    assert_eq!(decoded.data_start(), page.data_start());
    assert_eq!(decoded.data(), page.data());
    assert_eq!(decoded.records().count(), i);
}

// =============================================================================
// Space Accounting Tests
// =============================================================================

#[test]
fn test_free_space_tracks_consumed_bytes() {
    let mut page = Page::new(1);
    let mut consumed = 0usize;

    for (i, len) in [1usize, 17, 400, 3, 250, 99, 0].iter().enumerate() {
        let key = format!("k{i}");
        let value = vec![b'z'; *len];
        page.write_record(key.as_bytes(), &value).unwrap();
        consumed += record_size(key.len(), *len);

        assert_eq!(page.data_start() as usize, DATA_REGION_SIZE - consumed);
        assert_eq!(
            page.free_space() as usize,
            DATA_REGION_SIZE - consumed - page.record_count() as usize * SLOT_ENTRY_SIZE
        );
    }
}

#[test]
fn test_insufficient_space_reports_need() {
    let mut page = Page::new(1);
    while page.write_record(b"filler", &[0u8; 400]).is_ok() {}
    let free = page.free_space() as usize;
    let before = page.clone();

    let err = page.write_record(b"filler", &[0u8; 400]).unwrap_err();

    match err {
        PageKvError::InsufficientSpace { needed, available } => {
            assert_eq!(needed, record_size(6, 400) + SLOT_ENTRY_SIZE);
            assert_eq!(available, free);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(page, before);
}
