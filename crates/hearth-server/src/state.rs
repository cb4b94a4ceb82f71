//! Shared dashboard snapshot.
//!
//! The refresh loops write here; the display layer reads. Both lists are
//! replaced wholesale on every refresh (last writer wins), never mutated
//! in place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearth_core::{CalendarEvent, Photo};
use tokio::sync::RwLock;
use tracing::debug;

/// Latest aggregated events and resolved photos.
#[derive(Debug, Default)]
pub struct DashboardState {
    events: RwLock<Vec<CalendarEvent>>,
    photos: RwLock<Vec<Photo>>,
    events_updated_at: RwLock<Option<DateTime<Utc>>>,
    photos_updated_at: RwLock<Option<DateTime<Utc>>>,
}

/// Shared handle to the dashboard state.
pub type SharedState = Arc<DashboardState>;

/// Creates a new shared dashboard state.
pub fn new_shared_state() -> SharedState {
    Arc::new(DashboardState::default())
}

impl DashboardState {
    /// Returns a copy of the current event list.
    pub async fn events(&self) -> Vec<CalendarEvent> {
        self.events.read().await.clone()
    }

    /// Returns a copy of the current photo list.
    pub async fn photos(&self) -> Vec<Photo> {
        self.photos.read().await.clone()
    }

    /// When events were last replaced, if ever.
    pub async fn events_updated_at(&self) -> Option<DateTime<Utc>> {
        *self.events_updated_at.read().await
    }

    /// When photos were last replaced, if ever.
    pub async fn photos_updated_at(&self) -> Option<DateTime<Utc>> {
        *self.photos_updated_at.read().await
    }

    /// Replaces the event list.
    pub async fn set_events(&self, events: Vec<CalendarEvent>) {
        debug!(count = events.len(), "replacing event snapshot");
        *self.events.write().await = events;
        *self.events_updated_at.write().await = Some(Utc::now());
    }

    /// Replaces the photo list.
    pub async fn set_photos(&self, photos: Vec<Photo>) {
        debug!(count = photos.len(), "replacing photo snapshot");
        *self.photos.write().await = photos;
        *self.photos_updated_at.write().await = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let state = new_shared_state();
        assert!(state.events().await.is_empty());
        assert!(state.photos().await.is_empty());
        assert!(state.events_updated_at().await.is_none());
    }

    #[tokio::test]
    async fn set_replaces_wholesale() {
        let state = new_shared_state();

        state
            .set_photos(vec![Photo::new("https://x/1.jpeg", 1920, 1080)])
            .await;
        assert_eq!(state.photos().await.len(), 1);
        assert!(state.photos_updated_at().await.is_some());

        state.set_photos(Vec::new()).await;
        assert!(state.photos().await.is_empty());
    }
}
