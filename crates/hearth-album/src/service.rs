//! Fresh-vs-fallback photo policy.
//!
//! The resolution client propagates terminal failures; this service is the
//! caller-side policy around them: a success overwrites the cache, a
//! failure serves the previous non-empty photo set for that token at any
//! age, and only when no usable entry exists does the error reach the
//! caller.

use tokio::sync::RwLock;
use tracing::{info, warn};

use hearth_core::Photo;

use crate::cache::AlbumCache;
use crate::client::AlbumClient;
use crate::error::AlbumResult;

/// Photo retrieval with cache fallback.
pub struct PhotoService {
    client: AlbumClient,
    cache: RwLock<AlbumCache>,
}

impl PhotoService {
    /// Creates a service around a client and a (usually empty) cache.
    pub fn new(client: AlbumClient, cache: AlbumCache) -> Self {
        Self {
            client,
            cache: RwLock::new(cache),
        }
    }

    /// Returns the album's photos, preferring fresh over cached and cached
    /// over nothing.
    pub async fn photos(&self, album_token: &str) -> AlbumResult<Vec<Photo>> {
        match self.client.resolve_album(album_token).await {
            Ok(photos) => {
                self.cache.write().await.insert(album_token, photos.clone());
                info!(album = %album_token, count = photos.len(), "album refreshed");
                Ok(photos)
            }
            Err(error) => {
                let cache = self.cache.read().await;
                match cache.get(album_token) {
                    Some(entry) if !entry.photos.is_empty() => {
                        warn!(
                            album = %album_token,
                            error = %error,
                            age_secs = entry.age().num_seconds(),
                            stale = cache.is_stale(entry),
                            "album resolution failed, serving cached photos"
                        );
                        Ok(entry.photos.clone())
                    }
                    _ => Err(error),
                }
            }
        }
    }

    /// Number of album tokens currently cached.
    pub async fn cached_albums(&self) -> usize {
        self.cache.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AlbumConfig;
    use crate::error::AlbumError;
    use crate::http::testing::ScriptedHttp;
    use std::sync::Arc;

    const LISTING: &str = r#"{
        "photos": [
            {
                "photoGuid": "guid-1",
                "derivatives": {
                    "a": {"width": 1920, "height": 1080, "checksum": "c1"}
                }
            },
            {
                "photoGuid": "guid-2",
                "derivatives": {
                    "a": {"width": 1920, "height": 1080, "checksum": "c2"}
                }
            }
        ]
    }"#;

    const ASSETS: &str = r#"{
        "items": {
            "c1": {"url_location": "cvws.example.com", "url_path": "/p/1.jpeg"},
            "c2": {"url_location": "cvws.example.com", "url_path": "/p/2.jpeg"}
        }
    }"#;

    fn service(responses: Vec<AlbumResult<crate::http::AlbumResponse>>) -> PhotoService {
        let http = Arc::new(ScriptedHttp::new(responses));
        let client = AlbumClient::new(
            http,
            AlbumConfig::default()
                .with_default_host("default.test")
                .with_retry_attempts(1),
        );
        PhotoService::new(client, AlbumCache::default())
    }

    #[tokio::test]
    async fn success_populates_cache() {
        let service = service(vec![
            ScriptedHttp::ok(200, "{}"),
            ScriptedHttp::ok(200, LISTING),
            ScriptedHttp::ok(200, ASSETS),
        ]);

        let photos = service.photos("ABC").await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(service.cached_albums().await, 1);
    }

    #[tokio::test]
    async fn failure_falls_back_to_cached_photos() {
        let service = service(vec![
            // first call: success
            ScriptedHttp::ok(200, "{}"),
            ScriptedHttp::ok(200, LISTING),
            ScriptedHttp::ok(200, ASSETS),
            // second call reuses the cached host: listing succeeds but
            // asset resolution breaks terminally
            ScriptedHttp::ok(200, LISTING),
            ScriptedHttp::ok(500, "broken"),
        ]);

        let fresh = service.photos("ABC").await.unwrap();
        assert_eq!(fresh.len(), 2);

        let fallback = service.photos("ABC").await.unwrap();
        assert_eq!(fallback, fresh);
    }

    #[tokio::test]
    async fn failure_without_cache_propagates() {
        let service = service(vec![
            ScriptedHttp::ok(200, "{}"),
            ScriptedHttp::ok(500, "broken"),
        ]);

        let err = service.photos("ABC").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn empty_cached_entry_does_not_mask_failure() {
        let service = service(vec![
            // first call resolves an empty album
            ScriptedHttp::ok(200, "{}"),
            ScriptedHttp::ok(200, r#"{"photos": []}"#),
            // second call reuses the cached host and fails terminally
            ScriptedHttp::ok(500, "broken"),
        ]);

        assert!(service.photos("ABC").await.unwrap().is_empty());

        let err = service.photos("ABC").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn transport_failure_also_falls_back() {
        let service = service(vec![
            ScriptedHttp::ok(200, "{}"),
            ScriptedHttp::ok(200, LISTING),
            ScriptedHttp::ok(200, ASSETS),
            Err(AlbumError::transport("network unreachable")),
        ]);

        let fresh = service.photos("ABC").await.unwrap();
        let fallback = service.photos("ABC").await.unwrap();
        assert_eq!(fallback, fresh);
    }
}
