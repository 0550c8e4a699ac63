//! State store trait definition.

use crate::error::StorageResult;

/// A persisted string key-value store.
///
/// State stores hold the small set of string-valued entries QuoteSync keeps
/// across process restarts. They provide plain get/set/remove operations;
/// owners serialize richer values (the quote collection is a JSON array)
/// before handing them down.
///
/// # Invariants
///
/// - `set` is durable before it returns on persistent backends
/// - `get` returns exactly the value previously written for that key
/// - A missing key reads as `None`, never as an error
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::MemoryStateStore`] - For testing
/// - [`super::FileStateStore`] - For persistent storage
pub trait StateStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// On persistent backends the write is durable before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the entry under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be made durable.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
