//! Feed fetcher: retrieves raw feed bodies over HTTP.
//!
//! This is the transport layer of the calendar pipeline. It knows nothing
//! about the iCalendar format; it returns the response body as text and
//! surfaces transport and status failures as [`ProviderError`]s. Retry
//! policy belongs to callers that know the semantics of the specific
//! upstream, so none is applied here.

use std::time::Duration;

use hearth_core::BoxFuture;
use tracing::trace;

use crate::error::{ProviderError, ProviderResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("hearth/", env!("CARGO_PKG_VERSION"));

/// Object-safe fetch seam, so the aggregator can be tested with fakes.
pub trait FetchFeed: Send + Sync {
    /// Fetches the body at `url` as text.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<String>>;
}

/// HTTP feed fetcher backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    /// Creates a fetcher with the default timeout.
    pub fn new() -> ProviderResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ProviderError::transport(format!("failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    async fn fetch_text(&self, url: &str) -> ProviderResult<String> {
        url::Url::parse(url)
            .map_err(|e| ProviderError::configuration(format!("invalid feed URL {}: {}", url, e)))?;

        trace!(url = %url, "fetching feed");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::transport("request timeout").with_cause(e)
            } else if e.is_connect() {
                ProviderError::transport("connection failed").with_cause(e)
            } else {
                ProviderError::transport("request failed").with_cause(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::upstream(
                status.as_u16(),
                format!("feed fetch failed: {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::transport("failed to read response body").with_cause(e))
    }
}

impl FetchFeed for FeedFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(self.fetch_text(url))
    }
}
