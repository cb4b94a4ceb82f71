//! Dashboard service: wires the pipelines to the shared snapshot.

use hearth_album::PhotoService;
use hearth_core::CalendarSource;
use hearth_providers::Aggregator;
use tracing::info;

use crate::state::SharedState;

/// Ties the calendar and photo pipelines to the dashboard state.
pub struct DashboardService {
    aggregator: Aggregator,
    sources: Vec<CalendarSource>,
    photos: Option<(PhotoService, String)>,
    state: SharedState,
}

impl DashboardService {
    /// Creates a service for the given sources.
    pub fn new(aggregator: Aggregator, sources: Vec<CalendarSource>, state: SharedState) -> Self {
        Self {
            aggregator,
            sources,
            photos: None,
            state,
        }
    }

    /// Builder: enable the photo pipeline for one album token.
    pub fn with_photos(mut self, service: PhotoService, album_token: impl Into<String>) -> Self {
        self.photos = Some((service, album_token.into()));
        self
    }

    /// Returns the shared state handle.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Runs one aggregation pass and replaces the event snapshot.
    ///
    /// Cannot fail: the aggregator isolates per-source errors, so the
    /// worst case is a smaller (or empty) event list.
    pub async fn refresh_calendars(&self) -> Result<(), String> {
        let events = self.aggregator.aggregate(&self.sources).await;
        info!(count = events.len(), "calendar refresh complete");
        self.state.set_events(events).await;
        Ok(())
    }

    /// Refreshes the photo snapshot through the fallback policy.
    ///
    /// Fails only when resolution failed AND no usable cache entry exists;
    /// the stale-but-usable case succeeds with the cached photos.
    pub async fn refresh_photos(&self) -> Result<(), String> {
        let Some((service, album_token)) = self.photos.as_ref() else {
            return Ok(());
        };

        let photos = service
            .photos(album_token)
            .await
            .map_err(|e| e.to_string())?;
        self.state.set_photos(photos).await;
        Ok(())
    }
}
