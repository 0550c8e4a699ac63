//! Error types for QuoteSync core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A quote failed validation (empty text or category).
    #[error("validation error: {message}")]
    Validation {
        /// Description of what failed.
        message: String,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] quotesync_storage::StorageError),

    /// A value could not be serialized or deserialized.
    #[error("serialization error: {message}")]
    Serialize {
        /// Description of the failure.
        message: String,
    },

    /// A record index was out of range.
    #[error("index {index} out of range (store holds {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of records in the store.
        len: usize,
    },
}

impl CoreError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::validation("empty text");
        assert_eq!(err.to_string(), "validation error: empty text");

        let err = CoreError::IndexOutOfRange { index: 9, len: 3 };
        assert!(err.to_string().contains("9"));
        assert!(err.to_string().contains("3"));
    }
}
