//! Error types for PageKV
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

/// Result type alias using PageKvError
pub type Result<T> = std::result::Result<T, PageKvError>;

/// Unified error type for PageKV operations
#[derive(Debug, Error)]
pub enum PageKvError {
    // -------------------------------------------------------------------------
    // Input Validation Errors
    // -------------------------------------------------------------------------
    #[error("Key too large: {len} bytes (max {max})")]
    KeyTooLarge { len: usize, max: usize },

    #[error("Value too large: {len} bytes (max {max})")]
    ValueTooLarge { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Space Errors
    // -------------------------------------------------------------------------
    #[error("Insufficient space in page: need {needed} bytes, {available} available")]
    InsufficientSpace { needed: usize, available: usize },

    #[error("No page with enough space available")]
    NoSpaceAvailable,

    // -------------------------------------------------------------------------
    // Block Store Errors
    // -------------------------------------------------------------------------
    #[error("Read of {len} bytes at offset {offset} failed: {source}")]
    ReadFailure {
        offset: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("Write of {len} bytes at offset {offset} failed: {source}")]
    WriteFailure {
        offset: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Lookup / Format Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("Corrupt page {page_id}: {reason}")]
    CorruptPage { page_id: u64, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PageKvError {
    /// Shorthand for building a `CorruptPage` error
    pub(crate) fn corrupt(page_id: u64, reason: impl Into<String>) -> Self {
        PageKvError::CorruptPage {
            page_id,
            reason: reason.into(),
        }
    }
}
