//! Calendar source configuration entry.

use serde::{Deserialize, Serialize};

/// A configured calendar source.
///
/// Exactly one of `ical_url` / `provider_calendar_id` is expected to be set
/// for an enabled source; a source with neither is skipped by the
/// aggregator. Sources are loaded from configuration and immutable for the
/// process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSource {
    /// Stable identifier, stamped onto every event from this source.
    pub id: String,
    /// Human-readable name, used in logs only.
    pub name: String,
    /// Display color stamped onto every event from this source.
    pub color: String,
    /// Disabled sources are skipped without logging.
    pub enabled: bool,
    /// Raw iCalendar feed URL.
    pub ical_url: Option<String>,
    /// Calendar id on the structured provider API.
    pub provider_calendar_id: Option<String>,
}

impl Default for CalendarSource {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            color: String::new(),
            enabled: true,
            ical_url: None,
            provider_calendar_id: None,
        }
    }
}

impl CalendarSource {
    /// Creates a source with the given id, defaulting everything else.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Builder: set the iCal feed URL.
    pub fn with_ical_url(mut self, url: impl Into<String>) -> Self {
        self.ical_url = Some(url.into());
        self
    }

    /// Builder: set the structured-provider calendar id.
    pub fn with_provider_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.provider_calendar_id = Some(id.into());
        self
    }

    /// Builder: set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// True if the aggregator should fetch this source: enabled and with
    /// at least one upstream reference configured.
    pub fn is_fetchable(&self) -> bool {
        self.enabled && (self.ical_url.is_some() || self.provider_calendar_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetchable_requires_enabled_and_upstream() {
        let bare = CalendarSource::new("a");
        assert!(!bare.is_fetchable());

        let ical = CalendarSource::new("b").with_ical_url("https://example.com/cal.ics");
        assert!(ical.is_fetchable());

        let provider = CalendarSource::new("c").with_provider_calendar_id("work@example.com");
        assert!(provider.is_fetchable());

        let disabled = CalendarSource::new("d")
            .with_ical_url("https://example.com/cal.ics")
            .with_enabled(false);
        assert!(!disabled.is_fetchable());
    }

    #[test]
    fn deserializes_with_defaults() {
        let source: CalendarSource =
            serde_json::from_str(r##"{"id": "trash", "color": "#795548"}"##).unwrap();
        assert_eq!(source.id, "trash");
        assert!(source.enabled);
        assert!(source.ical_url.is_none());
        assert!(!source.is_fetchable());
    }
}
