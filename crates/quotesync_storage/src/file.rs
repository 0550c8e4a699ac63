//! File-based state store for persistent storage.

use crate::error::{StorageError, StorageResult};
use crate::store::StateStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file-based state store.
///
/// All entries are kept in one JSON object on disk. Entries survive process
/// restarts.
///
/// # Durability
///
/// Every `set`/`remove` serializes the full map to a temporary file in the
/// same directory and atomically renames it over the target path, so readers
/// never observe a partially written state file.
///
/// A missing file loads as an empty store. A file that cannot be parsed also
/// loads as empty - corrupt state is treated as absent, not fatal.
///
/// # Example
///
/// ```no_run
/// use quotesync_storage::{FileStateStore, StateStore};
/// use std::path::Path;
///
/// let mut store = FileStateStore::open(Path::new("quotesync.json")).unwrap();
/// store.set("quotes", "[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStateStore {
    /// Opens or creates a file state store at the given path.
    ///
    /// The file itself is only created on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    /// Opens or creates a file state store, creating parent directories if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or an existing file
    /// cannot be read.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::serialize(e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut tmp = fs::File::create(&tmp_path)?;
            tmp.write_all(raw.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
