//! Well-known state store keys.
//!
//! All persisted QuoteSync state lives under these keys. Values are strings;
//! the quote collection is a JSON array, the last-sync timestamp a decimal
//! number of milliseconds since the Unix epoch.

/// The serialized quote collection.
pub const QUOTES: &str = "quotes";

/// The last category the user selected for filtering.
pub const SELECTED_CATEGORY: &str = "selected_category";

/// Timestamp of the last successful sync pass.
pub const LAST_SYNC_AT: &str = "last_sync_at";
