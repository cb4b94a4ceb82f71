//! Normalized calendar event type.
//!
//! A [`CalendarEvent`] is the display-ready shape every calendar source is
//! reduced to: iCal feeds and the structured provider API both end up here.
//! Events are created fresh on every aggregation pass and never mutated.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A normalized calendar event.
///
/// The `id` is unique within one decoded feed but not across sources; the
/// aggregator deliberately does not deduplicate, so two sources exposing
/// the same underlying calendar will both contribute their copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Identifier from the upstream source (e.g. the iCal `UID`).
    pub id: String,
    /// Event title, already unescaped.
    pub title: String,
    /// When the event starts. All-day events start at local midnight.
    pub start: DateTime<Local>,
    /// When the event ends. Never before `start` once defaulted.
    pub end: DateTime<Local>,
    /// True for date-only events without a time component.
    pub all_day: bool,
    /// Display color inherited from the source configuration.
    pub color: String,
    /// Id of the [`CalendarSource`](crate::CalendarSource) this came from.
    pub source_id: String,
}

impl CalendarEvent {
    /// Duration of the event. Zero for single-day all-day events.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// True if the event is in progress at the given instant.
    pub fn is_ongoing_at(&self, at: DateTime<Local>) -> bool {
        self.start <= at && at < self.end
    }
}
