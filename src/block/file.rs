//! File-backed block store

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{PageKvError, Result};

use super::BlockStore;

/// Block store over a single file opened read/write
pub struct FileBlockStore {
    /// Path the file was opened from (for logging)
    path: PathBuf,
    /// Open handle; positioned reads and writes go through seek
    file: File,
    /// fdatasync after every write; `File` is unbuffered, so only the sync
    /// calls add durability
    sync_writes: bool,
}

impl FileBlockStore {
    /// Open (and optionally create) the backing file
    pub fn open(path: &Path, create_if_missing: bool, sync_writes: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(create_if_missing)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sync_writes,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlockStore for FileBlockStore {
    fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];

        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read_exact(&mut buf))
            .map_err(|source| PageKvError::ReadFailure {
                offset,
                len,
                source,
            })?;

        Ok(buf)
    }

    fn write(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        let len = bytes.len();

        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.write_all(bytes))
            .map_err(|source| PageKvError::WriteFailure {
                offset,
                len,
                source,
            })?;

        if self.sync_writes {
            self.file
                .sync_data()
                .map_err(|source| PageKvError::WriteFailure {
                    offset,
                    len,
                    source,
                })?;
        }

        Ok(())
    }

    fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_at_offset() {
        let temp = TempDir::new().unwrap();
        let mut store = FileBlockStore::open(&temp.path().join("data.db"), true, false).unwrap();

        store.write(8192, b"page-two").unwrap();

        assert_eq!(store.len().unwrap(), 8192 + 8);
        assert_eq!(store.read(8192, 8).unwrap(), b"page-two".to_vec());
        // The hole before the write reads back as zeros
        assert_eq!(store.read(0, 16).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn test_write_visible_to_fresh_handle() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.db");
        let mut store = FileBlockStore::open(&path, true, false).unwrap();

        store.write(4096, b"no-flush-needed").unwrap();

        let mut reader = FileBlockStore::open(&path, false, false).unwrap();
        assert_eq!(reader.read(4096, 15).unwrap(), b"no-flush-needed".to_vec());
        store.close().unwrap();
    }

    #[test]
    fn test_read_past_end_fails() {
        let temp = TempDir::new().unwrap();
        let mut store = FileBlockStore::open(&temp.path().join("data.db"), true, false).unwrap();

        let err = store.read(0, 4096).unwrap_err();

        match err {
            PageKvError::ReadFailure { offset, len, source } => {
                assert_eq!(offset, 0);
                assert_eq!(len, 4096);
                assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_missing_without_create_fails() {
        let temp = TempDir::new().unwrap();
        let result = FileBlockStore::open(&temp.path().join("missing.db"), false, false);

        assert!(matches!(result, Err(PageKvError::Io(_))));
    }
}
