//! The quote record and its identity rules.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A single quote/category pair.
///
/// Two quotes with the same [identity key](Quote::identity_key) are the same
/// quote for merge purposes, even when only one of them carries a remote
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// The quote text.
    pub text: String,
    /// The category the quote belongs to.
    pub category: String,
    /// Milliseconds since the Unix epoch of the last local update.
    #[serde(default)]
    pub updated_at: u64,
    /// Identifier assigned by the remote endpoint, if the quote has been
    /// synced or submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<u64>,
}

impl Quote {
    /// Creates a new local quote, trimming both fields and stamping the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the text or category is empty
    /// after trimming.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> CoreResult<Self> {
        let text = text.into().trim().to_string();
        let category = category.into().trim().to_string();

        if text.is_empty() {
            return Err(CoreError::validation("quote text must not be empty"));
        }
        if category.is_empty() {
            return Err(CoreError::validation("quote category must not be empty"));
        }

        Ok(Self {
            text,
            category,
            updated_at: now_millis(),
            remote_id: None,
        })
    }

    /// Returns the normalized identity key for this quote.
    #[must_use]
    pub fn identity_key(&self) -> String {
        identity_key(&self.text, &self.category)
    }

    /// Returns true if text and category are exactly equal to `other`'s.
    ///
    /// This is stricter than identity-key equality, which ignores case and
    /// surrounding whitespace.
    #[must_use]
    pub fn content_eq(&self, other: &Quote) -> bool {
        self.text == other.text && self.category == other.category
    }

    /// Returns true if this quote has never been matched to a remote record.
    #[must_use]
    pub fn is_local_only(&self) -> bool {
        self.remote_id.is_none()
    }
}

/// Computes the normalized identity key for a text/category pair.
///
/// The key is the trimmed, case-folded text and category joined with `"||"`.
#[must_use]
pub fn identity_key(text: &str, category: &str) -> String {
    format!(
        "{}||{}",
        text.trim().to_lowercase(),
        category.trim().to_lowercase()
    )
}

/// Returns the current time as milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
