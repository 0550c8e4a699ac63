//! # QuoteSync Storage
//!
//! Persisted-state backends for QuoteSync.
//!
//! This crate provides the string key-value boundary the rest of the system
//! persists through:
//! - [`StateStore`] - the backend trait
//! - [`FileStateStore`] - durable JSON-file-backed store
//! - [`MemoryStateStore`] - in-memory store for tests and ephemeral sessions
//!
//! Backends are **opaque string stores**. They do not interpret the values
//! they hold - the quote collection, the selected category, and the last-sync
//! timestamp are all serialized by their owners before they reach this layer.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub mod keys;

pub use error::{StorageError, StorageResult};
pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use store::StateStore;
