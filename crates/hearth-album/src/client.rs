//! Shared-album resolution client.
//!
//! Resolving an album token to displayable photo URLs takes three remote
//! calls:
//!
//! 1. Host discovery: the well-known default host may answer with a
//!    redirect-host header pointing at the region-specific backend. The
//!    discovered host is cached for the life of the client and reused for
//!    every album; it is an optimization, not a correctness-critical value.
//! 2. Stream listing: photo descriptors with their derivative maps.
//! 3. Asset URL resolution: checksum-to-URL map for the listed photos.
//!
//! The backend transiently rejects the first request after a period of
//! inactivity with a 403, so steps 2 and 3 retry on that status with a
//! fixed delay. Discovery is never retried.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use hearth_core::Photo;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::error::{AlbumError, AlbumResult};
use crate::http::AlbumHttp;
use crate::types::{AssetUrlMap, Derivative, StreamListing};

/// Well-known default host for shared-album requests.
pub const DEFAULT_ALBUM_HOST: &str = "p23-sharedstreams.icloud.com";

/// Target pixel area for derivative selection. Full-resolution photos cost
/// tens of megabytes decoded, so the derivative closest to the display
/// size is chosen, not the largest.
const TARGET_AREA: i64 = 1920 * 1080;

/// Album client configuration.
#[derive(Debug, Clone)]
pub struct AlbumConfig {
    /// Host used for discovery and as fallback when no redirect is given.
    pub default_host: String,
    /// Maximum attempts for the retried protocol steps.
    pub retry_attempts: u32,
    /// Fixed delay between retries.
    pub retry_delay: Duration,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            default_host: DEFAULT_ALBUM_HOST.to_string(),
            retry_attempts: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl AlbumConfig {
    /// Builder: set the default host.
    pub fn with_default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = host.into();
        self
    }

    /// Builder: set the retry attempt bound.
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    /// Builder: set the fixed retry delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Client for the shared-album resolution protocol.
pub struct AlbumClient {
    http: Arc<dyn AlbumHttp>,
    config: AlbumConfig,
    /// Discovered redirect host, shared across albums for the life of the
    /// client. Cleared on terminal failure so a stale host re-discovers.
    resolved_host: RwLock<Option<String>>,
}

impl AlbumClient {
    /// Creates a client over the given transport.
    pub fn new(http: Arc<dyn AlbumHttp>, config: AlbumConfig) -> Self {
        Self {
            http,
            config,
            resolved_host: RwLock::new(None),
        }
    }

    /// Resolves an album token to its photo list.
    ///
    /// An empty album is `Ok(vec![])`, not an error. Terminal failures
    /// surface as [`AlbumError`]; the caller owns the cache-fallback
    /// decision.
    pub async fn resolve_album(&self, album_token: &str) -> AlbumResult<Vec<Photo>> {
        let host = self.resolve_host(album_token).await?;

        match self.resolve_on_host(&host, album_token).await {
            Ok(photos) => Ok(photos),
            Err(error) => {
                // The cached host may have gone stale; drop it so the next
                // call starts from discovery again.
                *self.resolved_host.write().await = None;
                Err(error)
            }
        }
    }

    /// Returns the currently cached redirect host, if any.
    pub async fn cached_host(&self) -> Option<String> {
        self.resolved_host.read().await.clone()
    }

    async fn resolve_on_host(&self, host: &str, album_token: &str) -> AlbumResult<Vec<Photo>> {
        let listing_body = self
            .post_with_retry(
                &webstream_url(host, album_token),
                json!({"streamCtag": null}),
                "stream listing",
            )
            .await?;
        let listing: StreamListing = serde_json::from_str(&listing_body)
            .map_err(|e| AlbumError::invalid_response(format!("stream listing: {}", e)))?;

        if listing.photos.is_empty() {
            debug!(album = %album_token, "album stream is empty");
            return Ok(Vec::new());
        }

        let photo_guids: Vec<&str> = listing
            .photos
            .iter()
            .map(|p| p.photo_guid.as_str())
            .collect();
        let assets_body = self
            .post_with_retry(
                &webasseturls_url(host, album_token),
                json!({"photoGuids": photo_guids}),
                "asset URL resolution",
            )
            .await?;
        let assets: AssetUrlMap = serde_json::from_str(&assets_body)
            .map_err(|e| AlbumError::invalid_response(format!("asset URL map: {}", e)))?;

        let mut photos = Vec::new();
        for descriptor in &listing.photos {
            let Some(derivative) = select_derivative(&descriptor.derivatives) else {
                continue;
            };
            let Some(checksum) = derivative.checksum.as_deref() else {
                continue;
            };
            let Some(asset) = assets.items.get(checksum) else {
                trace!(guid = %descriptor.photo_guid, "no asset URL for selected derivative");
                continue;
            };

            photos.push(Photo::new(
                format!("https://{}{}", asset.url_location, asset.url_path),
                derivative.width,
                derivative.height,
            ));
        }

        debug!(album = %album_token, count = photos.len(), "resolved album photos");
        Ok(photos)
    }

    /// Returns the host to use for this token, discovering it on first use.
    ///
    /// Discovery is a single untried POST: only the redirect header
    /// matters, the status is ignored. A transient rejection here is
    /// recovered by the retried stream listing that follows.
    async fn resolve_host(&self, album_token: &str) -> AlbumResult<String> {
        if let Some(host) = self.resolved_host.read().await.clone() {
            return Ok(host);
        }

        let url = webstream_url(&self.config.default_host, album_token);
        let response = self.http.post(&url, json!({"streamCtag": null})).await?;

        let host = match response.redirect_host {
            Some(redirect) => {
                debug!(host = %redirect, "album backend redirected to region host");
                redirect
            }
            None => self.config.default_host.clone(),
        };

        *self.resolved_host.write().await = Some(host.clone());
        Ok(host)
    }

    /// POSTs with the transient-403 retry policy.
    ///
    /// Up to `retry_attempts` attempts; a 403 sleeps the fixed delay and
    /// retries, any other non-2xx (or running out of attempts) fails with
    /// the upstream status and body.
    async fn post_with_retry(
        &self,
        url: &str,
        body: serde_json::Value,
        operation: &str,
    ) -> AlbumResult<String> {
        let mut attempt = 1;

        loop {
            let response = self.http.post(url, body.clone()).await?;

            if response.is_success() {
                return Ok(response.body);
            }

            if response.status == 403 && attempt < self.config.retry_attempts {
                warn!(
                    operation = %operation,
                    attempt = attempt,
                    delay_secs = self.config.retry_delay.as_secs(),
                    "transient 403 from album backend, retrying"
                );
                tokio::time::sleep(self.config.retry_delay).await;
                attempt += 1;
                continue;
            }

            return Err(AlbumError::upstream(
                response.status,
                format!("{} failed: {}", operation, snippet(&response.body)),
            ));
        }
    }
}

/// Picks the derivative whose pixel area is closest to the display target.
///
/// Candidates are ordered by `(distance from target, map index)` so the
/// choice is deterministic; ties go to the first key in order.
pub fn select_derivative(derivatives: &BTreeMap<String, Derivative>) -> Option<&Derivative> {
    derivatives
        .values()
        .enumerate()
        .map(|(index, d)| ((d.area() - TARGET_AREA).abs(), index, d))
        .min_by_key(|(diff, index, _)| (*diff, *index))
        .map(|(_, _, d)| d)
}

fn webstream_url(host: &str, album_token: &str) -> String {
    format!("https://{}/{}/sharedstreams/webstream", host, album_token)
}

fn webasseturls_url(host: &str, album_token: &str) -> String {
    format!("https://{}/{}/sharedstreams/webasseturls", host, album_token)
}

/// Trims a response body down to a loggable error message.
fn snippet(body: &str) -> &str {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((index, _)) => &trimmed[..index],
        None => trimmed,
    }
}
