//! Error types for the sync subsystem.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network error while talking to the remote endpoint.
    #[error("network error: {message}")]
    Network {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The remote endpoint answered with a body we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Core store error during a pass.
    #[error("store error: {0}")]
    Core(#[from] quotesync_core::CoreError),

    /// A pass is already in flight; the request was dropped.
    #[error("a sync pass is already in progress")]
    SyncInProgress,

    /// A conflict index no longer points at a queued entry.
    #[error("conflict index {index} out of range (queue holds {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of queued conflicts.
        len: usize,
    },

    /// The periodic scheduler could not be started.
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

impl SyncError {
    /// Creates a retryable network error.
    pub fn network_retryable(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable network error.
    pub fn network_fatal(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried on a later pass.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Network { retryable, .. } => *retryable,
            SyncError::SyncInProgress => true,
            _ => false,
        }
    }
}
