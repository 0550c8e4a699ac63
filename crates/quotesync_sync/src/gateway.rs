//! Remote gateway abstraction.

use crate::error::SyncResult;
use parking_lot::Mutex;
use quotesync_core::Quote;
use std::sync::atomic::{AtomicU64, Ordering};

/// The remote capability surface the sync core consumes.
///
/// This trait abstracts the remote endpoint, allowing for different
/// implementations (HTTP, mock for testing, etc.). Records returned by
/// [`fetch_batch`](RemoteGateway::fetch_batch) each carry a remote
/// identifier.
pub trait RemoteGateway: Send + Sync {
    /// Fetches one batch of remote quotes.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Network`](crate::SyncError::Network) when the
    /// endpoint cannot be reached. A fetch failure aborts the whole pass.
    fn fetch_batch(&self) -> SyncResult<Vec<Quote>>;

    /// Submits one local quote and returns the identifier the endpoint
    /// assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Network`](crate::SyncError::Network) on failure.
    /// A submit failure must never roll back the local add; callers skip the
    /// remote-id enrichment and keep the local record.
    fn submit(&self, quote: &Quote) -> SyncResult<u64>;
}

/// A scriptable gateway for testing.
///
/// Defaults to an empty batch and successful submits with identifiers
/// assigned from 101 upwards.
#[derive(Debug)]
pub struct MockGateway {
    batch: Mutex<Result<Vec<Quote>, String>>,
    submit_failure: Mutex<Option<String>>,
    submitted: Mutex<Vec<Quote>>,
    next_remote_id: AtomicU64,
    fetch_calls: AtomicU64,
}

impl MockGateway {
    /// Creates a new mock gateway.
    #[must_use]
    pub fn new() -> Self {
        Self {
            batch: Mutex::new(Ok(Vec::new())),
            submit_failure: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            next_remote_id: AtomicU64::new(101),
            fetch_calls: AtomicU64::new(0),
        }
    }

    /// Scripts the next fetches to return the given batch.
    pub fn set_batch(&self, batch: Vec<Quote>) {
        *self.batch.lock() = Ok(batch);
    }

    /// Scripts fetches to fail with the given message.
    pub fn fail_fetch(&self, message: impl Into<String>) {
        *self.batch.lock() = Err(message.into());
    }

    /// Scripts submits to fail with the given message.
    pub fn fail_submit(&self, message: impl Into<String>) {
        *self.submit_failure.lock() = Some(message.into());
    }

    /// Restores successful submits.
    pub fn allow_submit(&self) {
        *self.submit_failure.lock() = None;
    }

    /// Returns the quotes submitted so far.
    #[must_use]
    pub fn submitted(&self) -> Vec<Quote> {
        self.submitted.lock().clone()
    }

    /// Returns how many times `fetch_batch` was called.
    #[must_use]
    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteGateway for MockGateway {
    fn fetch_batch(&self) -> SyncResult<Vec<Quote>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.batch.lock() {
            Ok(batch) => Ok(batch.clone()),
            Err(message) => Err(crate::SyncError::network_retryable(message.clone())),
        }
    }

    fn submit(&self, quote: &Quote) -> SyncResult<u64> {
        if let Some(message) = self.submit_failure.lock().clone() {
            return Err(crate::SyncError::network_retryable(message));
        }
        self.submitted.lock().push(quote.clone());
        Ok(self.next_remote_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_default_batch_is_empty() {
        let gateway = MockGateway::new();
        assert!(gateway.fetch_batch().unwrap().is_empty());
        assert_eq!(gateway.fetch_calls(), 1);
    }

    #[test]
    fn mock_scripted_fetch_failure() {
        let gateway = MockGateway::new();
        gateway.fail_fetch("server down");

        let result = gateway.fetch_batch();
        assert!(matches!(result, Err(crate::SyncError::Network { .. })));
    }

    #[test]
    fn mock_submit_assigns_increasing_ids() {
        let gateway = MockGateway::new();
        let quote = Quote::new("Stay hungry.", "Inspiration").unwrap();

        assert_eq!(gateway.submit(&quote).unwrap(), 101);
        assert_eq!(gateway.submit(&quote).unwrap(), 102);
        assert_eq!(gateway.submitted().len(), 2);
    }

    #[test]
    fn mock_submit_failure_records_nothing() {
        let gateway = MockGateway::new();
        gateway.fail_submit("timeout");

        let quote = Quote::new("Stay hungry.", "Inspiration").unwrap();
        assert!(gateway.submit(&quote).is_err());
        assert!(gateway.submitted().is_empty());
    }
}
