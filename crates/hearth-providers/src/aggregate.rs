//! Calendar aggregation across configured sources.
//!
//! The aggregator fans out to every fetchable source, decodes or converts
//! each source's events, and merges everything into one list sorted by
//! start time. A failing source never aborts the pass: its error is logged
//! and it contributes zero events. The aggregator holds no cache and is
//! idempotent per call; the refresh cadence belongs to the caller.

use std::sync::Arc;

use futures_util::future::join_all;
use hearth_core::{CalendarEvent, CalendarSource};
use tracing::{debug, warn};

use crate::api::ProviderApi;
use crate::error::{ProviderError, ProviderResult};
use crate::fetch::FetchFeed;
use crate::ical::decode_ical;

/// Aggregates events from iCal feeds and the structured provider API.
pub struct Aggregator {
    fetcher: Arc<dyn FetchFeed>,
    provider_api: Option<Arc<dyn ProviderApi>>,
}

impl Aggregator {
    /// Creates an aggregator that can serve iCal sources only.
    pub fn new(fetcher: Arc<dyn FetchFeed>) -> Self {
        Self {
            fetcher,
            provider_api: None,
        }
    }

    /// Builder: attach a structured provider API for
    /// `provider_calendar_id` sources.
    pub fn with_provider_api(mut self, api: Arc<dyn ProviderApi>) -> Self {
        self.provider_api = Some(api);
        self
    }

    /// Fetches all fetchable sources concurrently and merges the results.
    ///
    /// Never fails: per-source errors degrade to a smaller result set.
    /// Zero qualifying sources yields an empty list.
    pub async fn aggregate(&self, sources: &[CalendarSource]) -> Vec<CalendarEvent> {
        let fetchable: Vec<&CalendarSource> =
            sources.iter().filter(|s| s.is_fetchable()).collect();

        if fetchable.is_empty() {
            return Vec::new();
        }

        let results = join_all(fetchable.iter().map(|s| self.fetch_source(s))).await;

        let tagged = fetchable
            .iter()
            .zip(results)
            .map(|(source, result)| (source.id.clone(), result))
            .collect();

        merge_source_results(tagged)
    }

    /// Fetches one source's events, tagged with its id and color.
    async fn fetch_source(&self, source: &CalendarSource) -> ProviderResult<Vec<CalendarEvent>> {
        if let Some(ref url) = source.ical_url {
            let body = self
                .fetcher
                .fetch(url)
                .await
                .map_err(|e| e.with_source_id(&source.id))?;
            return Ok(decode_ical(&body, source));
        }

        if let Some(ref calendar_id) = source.provider_calendar_id {
            let api = self.provider_api.as_ref().ok_or_else(|| {
                ProviderError::configuration("no structured provider API configured")
                    .with_source_id(&source.id)
            })?;
            let events = api
                .fetch_events(calendar_id)
                .await
                .map_err(|e| e.with_source_id(&source.id))?;
            return Ok(events
                .into_iter()
                .map(|e| e.into_calendar_event(source))
                .collect());
        }

        // is_fetchable() guarantees one of the branches above.
        Ok(Vec::new())
    }
}

/// Collapses per-source results into one sorted event list.
///
/// Failures map to an empty contribution and a warning; they are never
/// propagated. The sort is stable, so for equal start times events keep
/// source-configuration order.
pub fn merge_source_results(
    results: Vec<(String, ProviderResult<Vec<CalendarEvent>>)>,
) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for (source_id, result) in results {
        match result {
            Ok(mut batch) => {
                debug!(source = %source_id, count = batch.len(), "source contributed events");
                events.append(&mut batch);
            }
            Err(error) => {
                warn!(source = %source_id, error = %error, "calendar source failed, skipping");
            }
        }
    }

    events.sort_by_key(|e| e.start);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProviderEvent;
    use chrono::{Local, TimeZone, Utc};
    use hearth_core::BoxFuture;

    /// Serves canned iCal bodies per URL; unknown URLs fail upstream.
    struct FakeFetcher {
        feeds: Vec<(String, String)>,
    }

    impl FetchFeed for FakeFetcher {
        fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
            let found = self
                .feeds
                .iter()
                .find(|(feed_url, _)| feed_url == url)
                .map(|(_, body)| body.clone());
            Box::pin(async move {
                found.ok_or_else(|| ProviderError::upstream(500, "feed unavailable"))
            })
        }
    }

    struct FakeProviderApi {
        events: Vec<ProviderEvent>,
    }

    impl ProviderApi for FakeProviderApi {
        fn fetch_events<'a>(
            &'a self,
            _calendar_id: &'a str,
        ) -> BoxFuture<'a, ProviderResult<Vec<ProviderEvent>>> {
            let events = self.events.clone();
            Box::pin(async move { Ok(events) })
        }
    }

    fn ical_body(uid: &str, summary: &str, start: &str, end: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:{}\r\nSUMMARY:{}\r\nDTSTART:{}\r\nDTEND:{}\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
            uid, summary, start, end
        )
    }

    fn ical_source(id: &str, url: &str) -> CalendarSource {
        CalendarSource::new(id).with_color("#123456").with_ical_url(url)
    }

    #[tokio::test]
    async fn merges_and_sorts_across_sources() {
        let fetcher = FakeFetcher {
            feeds: vec![
                (
                    "https://feeds.test/a.ics".to_string(),
                    ical_body("a-1", "Later", "20240115T150000", "20240115T160000"),
                ),
                (
                    "https://feeds.test/b.ics".to_string(),
                    ical_body("b-1", "Earlier", "20240115T090000", "20240115T100000"),
                ),
            ],
        };

        let aggregator = Aggregator::new(Arc::new(fetcher));
        let sources = vec![
            ical_source("a", "https://feeds.test/a.ics"),
            ical_source("b", "https://feeds.test/b.ics"),
        ];

        let events = aggregator.aggregate(&sources).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "b-1");
        assert_eq!(events[1].id, "a-1");
    }

    #[tokio::test]
    async fn failing_source_is_isolated() {
        let fetcher = FakeFetcher {
            feeds: vec![
                (
                    "https://feeds.test/one.ics".to_string(),
                    ical_body("one-1", "First", "20240115T090000", "20240115T100000"),
                ),
                (
                    "https://feeds.test/three.ics".to_string(),
                    ical_body("three-1", "Third", "20240115T110000", "20240115T120000"),
                ),
            ],
        };

        let aggregator = Aggregator::new(Arc::new(fetcher));
        let sources = vec![
            ical_source("one", "https://feeds.test/one.ics"),
            ical_source("two", "https://feeds.test/missing.ics"),
            ical_source("three", "https://feeds.test/three.ics"),
        ];

        let events = aggregator.aggregate(&sources).await;
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["one-1", "three-1"]);
    }

    #[tokio::test]
    async fn no_fetchable_sources_yields_empty() {
        let aggregator = Aggregator::new(Arc::new(FakeFetcher { feeds: vec![] }));

        let sources = vec![
            CalendarSource::new("disabled")
                .with_ical_url("https://feeds.test/x.ics")
                .with_enabled(false),
            CalendarSource::new("empty"),
        ];

        assert!(aggregator.aggregate(&sources).await.is_empty());
    }

    #[tokio::test]
    async fn provider_source_without_api_contributes_nothing() {
        let aggregator = Aggregator::new(Arc::new(FakeFetcher { feeds: vec![] }));
        let sources = vec![CalendarSource::new("work").with_provider_calendar_id("work@test")];

        assert!(aggregator.aggregate(&sources).await.is_empty());
    }

    #[tokio::test]
    async fn provider_events_are_tagged_and_merged() {
        let provider = FakeProviderApi {
            events: vec![ProviderEvent {
                id: "p-1".to_string(),
                summary: "Provider meeting".to_string(),
                start: Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
                all_day: false,
            }],
        };

        let aggregator =
            Aggregator::new(Arc::new(FakeFetcher { feeds: vec![] })).with_provider_api(Arc::new(provider));

        let sources = vec![
            CalendarSource::new("work")
                .with_color("#003a9b")
                .with_provider_calendar_id("work@test"),
        ];

        let events = aggregator.aggregate(&sources).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source_id, "work");
        assert_eq!(events[0].color, "#003a9b");
    }

    #[test]
    fn merge_maps_failures_to_empty() {
        let start = Local.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let event = CalendarEvent {
            id: "ok-1".to_string(),
            title: "Kept".to_string(),
            start,
            end: start + chrono::Duration::hours(1),
            all_day: false,
            color: String::new(),
            source_id: "ok".to_string(),
        };

        let merged = merge_source_results(vec![
            ("ok".to_string(), Ok(vec![event.clone()])),
            (
                "bad".to_string(),
                Err(ProviderError::upstream(503, "unavailable")),
            ),
        ]);

        assert_eq!(merged, vec![event]);
    }
}
