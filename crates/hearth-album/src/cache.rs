//! Album photo cache.
//!
//! One entry per album token, overwritten on every successful resolution
//! and read as a fallback when resolution fails. There is no eviction: an
//! ambient display prefers stale photos over a blank wall, so entries stay
//! usable indefinitely. The TTL here is advisory and feeds logging only.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hearth_core::Photo;
use tracing::debug;

/// Cached photo set for one album token.
#[derive(Debug, Clone)]
pub struct AlbumCacheEntry {
    /// The last successfully resolved photo list.
    pub photos: Vec<Photo>,
    /// When the entry was written.
    pub fetched_at: DateTime<Utc>,
}

impl AlbumCacheEntry {
    fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos,
            fetched_at: Utc::now(),
        }
    }

    /// Time since the entry was written.
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.fetched_at
    }
}

/// In-memory cache of resolved photo sets, keyed by album token.
#[derive(Debug)]
pub struct AlbumCache {
    advisory_ttl: chrono::Duration,
    entries: HashMap<String, AlbumCacheEntry>,
}

impl Default for AlbumCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}

impl AlbumCache {
    /// Creates a cache with the given advisory TTL.
    pub fn new(advisory_ttl: Duration) -> Self {
        Self {
            advisory_ttl: chrono::Duration::from_std(advisory_ttl)
                .unwrap_or_else(|_| chrono::Duration::hours(1)),
            entries: HashMap::new(),
        }
    }

    /// Gets the entry for a token, regardless of age.
    pub fn get(&self, album_token: &str) -> Option<&AlbumCacheEntry> {
        self.entries.get(album_token)
    }

    /// Inserts or overwrites the entry for a token.
    pub fn insert(&mut self, album_token: impl Into<String>, photos: Vec<Photo>) {
        let album_token = album_token.into();
        debug!(album = %album_token, count = photos.len(), "caching resolved photos");
        self.entries
            .insert(album_token, AlbumCacheEntry::new(photos));
    }

    /// True when the entry is older than the advisory TTL. Staleness never
    /// blocks use of the entry; it only colors the logs.
    pub fn is_stale(&self, entry: &AlbumCacheEntry) -> bool {
        entry.age() > self.advisory_ttl
    }

    /// Returns the number of cached albums.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
