//! Configuration for the sync subsystem.

use std::time::Duration;

/// Configuration for sync passes and the periodic scheduler.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote endpoint.
    pub server_url: String,
    /// Maximum number of records fetched per pass.
    pub batch_size: u32,
    /// Interval between scheduled passes.
    pub interval: Duration,
    /// Request timeout for remote calls.
    pub timeout: Duration,
}

impl SyncConfig {
    /// Creates a configuration for the given endpoint with reference
    /// defaults: batch size 8, 30 second interval, 10 second timeout.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            batch_size: 8,
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the fetch batch size.
    #[must_use]
    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the scheduler interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("https://jsonplaceholder.typicode.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = SyncConfig::new("https://quotes.example.com")
            .with_batch_size(16)
            .with_interval(Duration::from_secs(60))
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.server_url, "https://quotes.example.com");
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.interval, Duration::from_secs(30));
    }
}
