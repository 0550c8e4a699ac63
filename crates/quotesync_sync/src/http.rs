//! HTTP gateway implementation.
//!
//! This module maps a JSONPlaceholder-style posts resource onto the
//! [`RemoteGateway`] capability. The actual HTTP client is abstracted via a
//! trait to allow different implementations (reqwest, ureq, a loopback stub
//! for tests, etc.).

use crate::error::{SyncError, SyncResult};
use crate::gateway::RemoteGateway;
use quotesync_core::{now_millis, Quote};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The fixed category list remote records are mapped onto.
///
/// The endpoint's posts carry no category of their own; each record is
/// assigned one deterministically from its numeric `userId` field, modulo
/// this list.
pub const SERVER_CATEGORIES: &[&str] =
    &["Inspiration", "Productivity", "Programming", "Mindset", "Life"];

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual transport. Errors are plain
/// strings; the gateway wraps them into [`SyncError::Network`].
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response body.
    fn get(&self, url: &str) -> Result<String, String>;

    /// Sends a POST request with a JSON body and returns the response body.
    fn post_json(&self, url: &str, body: &str) -> Result<String, String>;
}

/// One post as served by the remote endpoint.
#[derive(Debug, Deserialize)]
struct RemotePost {
    #[serde(rename = "userId", default)]
    user_id: u64,
    id: u64,
    #[serde(default)]
    title: String,
}

/// The JSON body sent when submitting a quote.
#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    title: &'a str,
    body: &'a str,
}

/// The identifier-bearing response to a submit.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: u64,
}

/// An HTTP-backed remote gateway.
pub struct HttpGateway<C: HttpClient> {
    base_url: String,
    batch_size: u32,
    client: C,
}

impl<C: HttpClient> HttpGateway<C> {
    /// Creates a gateway against the given base URL with the reference batch
    /// size of 8.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            batch_size: 8,
            client,
        }
    }

    /// Sets the fetch batch size.
    #[must_use]
    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_post(post: RemotePost) -> Option<Quote> {
        let text = post.title.trim().to_string();
        if text.is_empty() {
            debug!("skipping remote record {} with empty title", post.id);
            return None;
        }
        let category = SERVER_CATEGORIES[post.user_id as usize % SERVER_CATEGORIES.len()];
        Some(Quote {
            text,
            category: category.to_string(),
            updated_at: now_millis(),
            remote_id: Some(post.id),
        })
    }
}

impl<C: HttpClient> RemoteGateway for HttpGateway<C> {
    fn fetch_batch(&self) -> SyncResult<Vec<Quote>> {
        let url = format!("{}/posts?_limit={}", self.base_url, self.batch_size);
        let body = self
            .client
            .get(&url)
            .map_err(SyncError::network_retryable)?;

        let posts: Vec<RemotePost> = serde_json::from_str(&body)
            .map_err(|e| SyncError::InvalidResponse(e.to_string()))?;

        Ok(posts.into_iter().filter_map(Self::map_post).collect())
    }

    fn submit(&self, quote: &Quote) -> SyncResult<u64> {
        let url = format!("{}/posts", self.base_url);
        let body = serde_json::to_string(&SubmitBody {
            title: &quote.text,
            body: &quote.category,
        })
        .map_err(|e| SyncError::InvalidResponse(e.to_string()))?;

        let response = self
            .client
            .post_json(&url, &body)
            .map_err(SyncError::network_retryable)?;

        let parsed: SubmitResponse = serde_json::from_str(&response)
            .map_err(|e| SyncError::InvalidResponse(e.to_string()))?;

        Ok(parsed.id)
    }
}
