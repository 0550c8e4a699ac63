//! In-memory state store for testing.

use crate::error::StorageResult;
use crate::store::StateStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory state store.
///
/// This backend holds all entries in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral sessions that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use quotesync_storage::{MemoryStateStore, StateStore};
///
/// let mut store = MemoryStateStore::new();
/// store.set("quotes", "[]").unwrap();
/// assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStateStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given entries.
    ///
    /// Useful for testing recovery and corrupt-state scenarios.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn entries(&self) -> HashMap<String, String> {
        self.entries.read().clone()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.write().clear();
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let store = MemoryStateStore::new();
        assert!(store.entries().is_empty());
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn memory_set_then_get() {
        let mut store = MemoryStateStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn memory_set_overwrites() {
        let mut store = MemoryStateStore::new();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn memory_remove() {
        let mut store = MemoryStateStore::new();
        store.set("a", "1").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);

        // Removing an absent key is a no-op.
        store.remove("a").unwrap();
    }

    #[test]
    fn memory_with_entries() {
        let store = MemoryStateStore::with_entries([("k".to_string(), "v".to_string())]);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn memory_clear() {
        let mut store = MemoryStateStore::new();
        store.set("a", "1").unwrap();
        store.clear();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
