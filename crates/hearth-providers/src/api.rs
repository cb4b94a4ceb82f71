//! Structured calendar provider contract.
//!
//! Some sources are not iCal feeds but a calendar-provider API that returns
//! pre-normalized events. That API and its authentication flow live outside
//! this crate; what is defined here is the seam:
//!
//! - [`ProviderApi`] - fetch pre-normalized events for one calendar id
//! - [`CredentialProvider`] - black box yielding a current bearer token
//! - [`HttpProviderApi`] - a thin reqwest-backed implementation against a
//!   configured base URL
//!
//! Token refresh is not managed here; a credential provider that cannot
//! produce a token fails with an `Unauthenticated` error and the source
//! contributes nothing for that aggregation pass.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use hearth_core::{BoxFuture, CalendarEvent, CalendarSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A pre-normalized event as returned by the structured provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEvent {
    /// Provider-side event id.
    pub id: String,
    /// Event title.
    pub summary: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// True for date-only events.
    #[serde(default)]
    pub all_day: bool,
}

impl ProviderEvent {
    /// Converts into a display event tagged with the source's id and color.
    pub fn into_calendar_event(self, source: &CalendarSource) -> CalendarEvent {
        CalendarEvent {
            id: self.id,
            title: self.summary,
            start: self.start.with_timezone(&Local),
            end: self.end.with_timezone(&Local),
            all_day: self.all_day,
            color: source.color.clone(),
            source_id: source.id.clone(),
        }
    }
}

/// Supplies a current bearer token for calendar reads.
///
/// Token acquisition and refresh are external concerns; implementations
/// fail with an `Unauthenticated` error when no valid token is available.
pub trait CredentialProvider: Send + Sync {
    /// Returns a bearer token valid for the next request.
    fn bearer_token(&self) -> BoxFuture<'_, ProviderResult<String>>;
}

/// Credential provider backed by a fixed token string, as resolved from
/// configuration.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Creates a provider around the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> BoxFuture<'_, ProviderResult<String>> {
        let token = self.token.clone();
        Box::pin(async move {
            if token.is_empty() {
                Err(ProviderError::unauthenticated("bearer token is empty"))
            } else {
                Ok(token)
            }
        })
    }
}

/// The structured calendar API seam.
pub trait ProviderApi: Send + Sync {
    /// Fetches pre-normalized events for the given calendar id.
    fn fetch_events<'a>(
        &'a self,
        calendar_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Vec<ProviderEvent>>>;
}

/// HTTP implementation of [`ProviderApi`].
///
/// Issues `GET {base_url}/calendars/{calendar_id}/events` with bearer
/// authentication and parses the pre-normalized event list.
pub struct HttpProviderApi {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpProviderApi {
    /// Creates a client against the given API base URL.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| {
                ProviderError::transport(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn fetch_calendar(&self, calendar_id: &str) -> ProviderResult<Vec<ProviderEvent>> {
        let token = self.credentials.bearer_token().await?;
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::transport("request timeout").with_cause(e)
                } else {
                    ProviderError::transport("request failed").with_cause(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::unauthenticated(
                "provider rejected bearer token",
            ));
        }
        if !status.is_success() {
            return Err(ProviderError::upstream(
                status.as_u16(),
                format!("provider event listing failed: {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport("failed to read response body").with_cause(e))?;
        let events: Vec<ProviderEvent> = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response("malformed provider event list").with_cause(e)
        })?;

        debug!(calendar_id = %calendar_id, count = events.len(), "fetched provider events");
        Ok(events)
    }
}

impl ProviderApi for HttpProviderApi {
    fn fetch_events<'a>(
        &'a self,
        calendar_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Vec<ProviderEvent>>> {
        Box::pin(self.fetch_calendar(calendar_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::TimeZone;

    #[test]
    fn provider_event_wire_shape() {
        let json = r#"{
            "id": "evt-1",
            "summary": "Sprint review",
            "start": "2024-01-15T18:00:00Z",
            "end": "2024-01-15T19:00:00Z",
            "allDay": false
        }"#;

        let event: ProviderEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "evt-1");
        assert_eq!(event.summary, "Sprint review");
        assert!(!event.all_day);
        assert_eq!(
            event.start,
            Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn conversion_tags_source_id_and_color() {
        let event = ProviderEvent {
            id: "evt-1".to_string(),
            summary: "Sprint review".to_string(),
            start: Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 15, 19, 0, 0).unwrap(),
            all_day: false,
        };

        let source = CalendarSource::new("work").with_color("#003a9b");
        let converted = event.into_calendar_event(&source);

        assert_eq!(converted.source_id, "work");
        assert_eq!(converted.color, "#003a9b");
        assert_eq!(converted.title, "Sprint review");
        assert_eq!(
            converted.start,
            Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0)
                .unwrap()
                .with_timezone(&Local)
        );
    }

    #[tokio::test]
    async fn static_token_yields_its_value() {
        let credentials = StaticToken::new("abc123");
        assert_eq!(credentials.bearer_token().await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn empty_static_token_is_unauthenticated() {
        let credentials = StaticToken::new("");
        let err = credentials.bearer_token().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Unauthenticated);
    }
}
