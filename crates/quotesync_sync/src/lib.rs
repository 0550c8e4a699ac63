//! # QuoteSync Sync
//!
//! Merge engine, conflict queue, and sync scheduler for QuoteSync.
//!
//! This crate provides:
//! - Remote gateway abstraction (HTTP mapping + scriptable mock)
//! - The merge engine (remote-wins reconciliation with a conflict log)
//! - The manual-resolution conflict queue
//! - The sync service and its periodic scheduler
//!
//! ## Architecture
//!
//! A sync pass is **fetch, merge, push**:
//! 1. Fetch one batch from the remote gateway (the only fatal step)
//! 2. Merge it into the local store, remote-wins, logging divergences
//! 3. Submit local-only quotes, attaching the identifiers they get back
//!
//! ## Key Invariants
//!
//! - A fetch failure aborts the pass with no local mutation
//! - Local-only quotes are never removed or mutated by a merge
//! - Passes and manual resolution are serialized by one in-flight flag
//! - The store is read only after the fetch settles, never from a snapshot
//!   taken before the network call

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod conflict;
mod error;
mod gateway;
mod http;
mod merge;
mod service;

pub use config::SyncConfig;
pub use conflict::{ConflictEntry, ConflictQueue, Resolution};
pub use error::{SyncError, SyncResult};
pub use gateway::{MockGateway, RemoteGateway};
pub use http::{HttpClient, HttpGateway, SERVER_CATEGORIES};
pub use merge::{merge_batch, MergeOutcome};
pub use service::{SyncOptions, SyncReport, SyncService, SyncState};
