//! # QuoteSync Core
//!
//! Quote data model and store for QuoteSync.
//!
//! This crate provides:
//! - [`Quote`] - a quote/category pair with identity rules
//! - [`QuoteStore`] - the ordered, persistently backed quote collection
//! - Category filtering, random selection, and JSON export/import
//!
//! ## Key Invariants
//!
//! - Text and category are non-empty after trimming
//! - The store preserves insertion order
//! - Every successful mutation is persisted before it returns
//! - After a merge pass completes, at most one record per identity key is
//!   authoritative

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod quote;
mod store;

pub use error::{CoreError, CoreResult};
pub use quote::{identity_key, now_millis, Quote};
pub use store::{ImportMode, QuoteStore, ALL_CATEGORY};

/// The version of the core crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
