//! Page Manager
//!
//! Places records into pages and moves pages between memory and the block
//! store.
//!
//! ## Responsibilities
//! - Own the database metadata (page 0) and allocate page ids
//! - Load, validate and persist data pages at `page_id * PAGE_SIZE`
//! - Find the first page with room for a record, or allocate a new one
//! - Look keys up by scanning every data page in ascending id order
//!
//! There is no page cache: every operation reloads the pages it touches.
//! Pages that fail to load or decode are skipped by the scans (and logged),
//! so one damaged page does not block inserts or lookups elsewhere.

use tracing::{debug, info, warn};

use crate::block::BlockStore;
use crate::error::{PageKvError, Result};
use crate::meta::DatabaseMeta;
use crate::page::{check_sizes, page_offset, record_size, Page, META_PAGE_ID, PAGE_SIZE};

/// Single-threaded page manager over a block store
///
/// Exclusively owns its store; sharing one file between two managers is
/// unsupported.
pub struct PageManager<S: BlockStore> {
    /// Backing storage
    store: S,
    /// In-memory copy of page 0
    meta: DatabaseMeta,
}

impl<S: BlockStore> PageManager<S> {
    /// Open a manager over `store`
    ///
    /// An empty store gets fresh metadata written to page 0; otherwise page 0
    /// is loaded and validated.
    pub fn open(store: S) -> Result<Self> {
        let mut manager = Self {
            store,
            meta: DatabaseMeta::new(),
        };

        if manager.store.is_empty()? {
            info!("Initializing empty database");
            manager.save_meta_page()?;
        } else {
            let meta = manager.load_meta_page()?;
            manager.check_meta_within_store()?;
            info!(
                next_page_id = meta.next_page_id,
                page_count = meta.page_count,
                last_page_id = meta.last_page_id,
                "Loaded database metadata"
            );
        }

        Ok(manager)
    }

    /// Current metadata snapshot
    pub fn meta(&self) -> DatabaseMeta {
        self.meta
    }

    // =========================================================================
    // Page Allocation
    // =========================================================================

    /// Allocate an empty page with the next id
    ///
    /// Only the in-memory metadata changes; persisting the page and page 0
    /// is up to the caller.
    pub fn create_page(&mut self) -> Result<Page> {
        let (next, page_id) = self.meta.allocate()?;
        self.meta = next;
        debug!(page_id, page_count = next.page_count, "Allocated page");
        Ok(Page::new(page_id))
    }

    /// Allocate a page and make it durable together with page 0
    ///
    /// Metadata is rolled back in memory if either write fails.
    fn allocate_page(&mut self) -> Result<Page> {
        let previous = self.meta;
        let page = self.create_page()?;

        let persisted = self
            .persist_page(&page)
            .and_then(|()| self.save_meta_page());
        if let Err(e) = persisted {
            self.meta = previous;
            return Err(e);
        }

        Ok(page)
    }

    // =========================================================================
    // Metadata Page
    // =========================================================================

    /// Reload page 0 into the manager
    pub fn load_meta_page(&mut self) -> Result<DatabaseMeta> {
        let bytes = self.store.read(0, PAGE_SIZE)?;
        self.meta = DatabaseMeta::from_bytes(&bytes)?;
        Ok(self.meta)
    }

    /// Reject metadata claiming pages past the end of the store
    fn check_meta_within_store(&self) -> Result<()> {
        let last_page_id = self.meta.last_page_id;
        if last_page_id == META_PAGE_ID {
            return Ok(());
        }

        let store_len = self.store.len()?;
        let required = page_offset(last_page_id).map(|offset| offset + PAGE_SIZE as u64);
        match required {
            Some(end) if end <= store_len => Ok(()),
            _ => Err(PageKvError::corrupt(
                META_PAGE_ID,
                format!(
                    "last_page_id {} lies beyond the {} byte store",
                    last_page_id, store_len
                ),
            )),
        }
    }

    /// Write the current metadata to page 0
    pub fn save_meta_page(&mut self) -> Result<()> {
        self.store.write(0, &self.meta.to_bytes())
    }

    // =========================================================================
    // Data Pages
    // =========================================================================

    /// Read and decode data page `page_id`
    pub fn load_page(&mut self, page_id: u64) -> Result<Page> {
        let offset = data_page_offset(page_id)?;
        let bytes = self.store.read(offset, PAGE_SIZE)?;
        let page = Page::from_bytes(&bytes)?;

        if page.page_id() != page_id {
            return Err(PageKvError::corrupt(
                page_id,
                format!("header carries page id {}", page.page_id()),
            ));
        }

        debug!(page_id, records = page.record_count(), free = page.free_space(), "Loaded page");
        Ok(page)
    }

    /// Write `page` (header + data region) at its offset
    pub fn persist_page(&mut self, page: &Page) -> Result<()> {
        let offset = data_page_offset(page.page_id())?;
        self.store.write(offset, &page.to_bytes())
    }

    /// First page, in ascending id order, with room for `record_size` bytes
    /// plus a slot entry
    ///
    /// Fails with `NoSpaceAvailable` when no existing page qualifies.
    pub fn find_page_with_space(&mut self, record_size: usize) -> Result<Page> {
        for page_id in self.meta.data_page_ids() {
            match self.load_page(page_id) {
                Ok(page) if page.has_space(record_size) => return Ok(page),
                Ok(_) => {}
                Err(e) => warn!(page_id, error = %e, "Skipping unreadable page"),
            }
        }
        Err(PageKvError::NoSpaceAvailable)
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Store a key/value pair
    ///
    /// The record lands in the first page with room, or in a freshly
    /// allocated page. It is durable once the final page write returns.
    pub fn insert_record(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        check_sizes(key, value)?;
        let size = record_size(key.len(), value.len());

        let mut page = match self.find_page_with_space(size) {
            Ok(page) => page,
            Err(PageKvError::NoSpaceAvailable) => self.allocate_page()?,
            Err(e) => return Err(e),
        };

        page.write_record(key, value)?;
        self.persist_page(&page)?;

        debug!(
            page_id = page.page_id(),
            key_len = key.len(),
            value_len = value.len(),
            "Inserted record"
        );
        Ok(())
    }

    /// Value of the first active record matching `key`
    ///
    /// Pages are searched in ascending id order, each in slot order. Fails
    /// with `KeyNotFound` if no page holds the key.
    pub fn find_record(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        for page_id in self.meta.data_page_ids() {
            let found = self
                .load_page(page_id)
                .and_then(|page| page.read_record(key));

            match found {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) => warn!(page_id, error = %e, "Skipping unreadable page"),
            }
        }
        Err(PageKvError::KeyNotFound)
    }

    /// Every active record, by ascending page id then slot order
    pub fn scan(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut entries = Vec::new();

        for page_id in self.meta.data_page_ids() {
            let records = self.load_page(page_id).and_then(|page| {
                page.records()
                    .map(|record| record.map(|(k, v)| (k.to_vec(), v.to_vec())))
                    .collect::<Result<Vec<_>>>()
            });

            match records {
                Ok(records) => entries.extend(records),
                Err(e) => warn!(page_id, error = %e, "Skipping unreadable page"),
            }
        }

        Ok(entries)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Flush the block store
    pub fn sync(&mut self) -> Result<()> {
        self.store.sync()
    }

    /// Release the block store
    pub fn close(self) -> Result<()> {
        self.store.close()
    }

    /// Borrow the block store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the block store without closing it
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Offset of a data page; page 0 and unaddressable ids are rejected
fn data_page_offset(page_id: u64) -> Result<u64> {
    if page_id == META_PAGE_ID {
        return Err(PageKvError::corrupt(page_id, "page 0 holds metadata, not records"));
    }
    page_offset(page_id)
        .ok_or_else(|| PageKvError::corrupt(page_id, "page id beyond addressable range"))
}
