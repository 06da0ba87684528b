//! # PageKV
//!
//! A minimal single-file key-value store built on fixed-size slotted pages:
//! - 4096-byte pages, slot array at the bottom, records packed from the top
//! - Page 0 holds the page-id allocation metadata
//! - Lookups scan every page; there is no index
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Database (put / get)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      PageManager                            │
//! │     metadata (page 0) · placement · linear lookup scans     │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │      Page       │                │   BlockStore    │
//!   │ slots + records │                │  offset r / w   │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod block;
pub mod page;
pub mod meta;
pub mod pager;
pub mod db;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PageKvError, Result};
pub use config::Config;
pub use db::Database;
pub use pager::PageManager;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of PageKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
