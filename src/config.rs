//! Configuration for PageKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a PageKV database
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single database file.
    /// Layout:
    ///   page 0          (metadata: next page id, page count, last page id)
    ///   page 1..=last   (slotted data pages)
    pub path: PathBuf,

    /// Create the file if it does not exist yet
    pub create_if_missing: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// fdatasync after every page write
    pub sync_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./pagekv.db"),
            create_if_missing: true,
            sync_writes: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Create the file when missing (default: true)
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Sync every page write to stable storage (default: false)
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
