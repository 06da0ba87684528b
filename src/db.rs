//! Database facade
//!
//! Opens the database file and exposes `put`/`get` on top of the page
//! manager.

use std::path::Path;

use parking_lot::Mutex;
use tracing::info;

use crate::block::FileBlockStore;
use crate::config::Config;
use crate::error::{PageKvError, Result};
use crate::meta::DatabaseMeta;
use crate::pager::PageManager;

/// A single-file key-value database
///
/// The page manager is single-threaded; the mutex serializes every call so
/// a `Database` can still be shared behind an `Arc`.
pub struct Database {
    /// Database configuration
    config: Config,

    /// Page manager over the database file
    pager: Mutex<PageManager<FileBlockStore>>,
}

impl Database {
    /// Open or create the database described by `config`
    pub fn open(config: Config) -> Result<Self> {
        if config.path.as_os_str().is_empty() {
            return Err(PageKvError::Config("database path is empty".to_string()));
        }

        let store = FileBlockStore::open(
            &config.path,
            config.create_if_missing,
            config.sync_writes,
        )?;
        let pager = PageManager::open(store)?;

        info!(path = %config.path.display(), "Opened database");

        Ok(Self {
            config,
            pager: Mutex::new(pager),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Store a key/value pair
    ///
    /// Keys and values are limited to 400 bytes each. Putting an existing key
    /// adds a second record; `get` keeps returning the first one.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.pager.lock().insert_record(key, value)
    }

    /// Look a key up
    ///
    /// Returns `Ok(None)` if the key was never stored.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.pager.lock().find_record(key) {
            Ok(value) => Ok(Some(value)),
            Err(PageKvError::KeyNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// All active records, in storage order
    pub fn scan(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.pager.lock().scan()
    }

    /// Current allocation metadata
    pub fn meta(&self) -> DatabaseMeta {
        self.pager.lock().meta()
    }

    /// Flush all writes to stable storage
    pub fn sync(&self) -> Result<()> {
        self.pager.lock().sync()
    }

    /// Close the database file
    pub fn close(self) -> Result<()> {
        info!(path = %self.config.path.display(), "Closing database");
        self.pager.into_inner().close()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
