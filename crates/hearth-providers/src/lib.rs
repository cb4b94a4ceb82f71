//! Calendar pipeline: feed fetching, iCalendar decoding, aggregation.
//!
//! Data flows leaf-first:
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────┐
//! │  iCal feed   │     │ structured provider │
//! └──────┬───────┘     └──────────┬──────────┘
//!        │ FeedFetcher            │ ProviderApi
//!        ▼                        ▼
//! ┌──────────────┐     ┌─────────────────────┐
//! │ decode_ical  │     │    ProviderEvent    │
//! └──────┬───────┘     └──────────┬──────────┘
//!        │                        │
//!        └──────────┬─────────────┘
//!                   ▼ Aggregator::aggregate
//!         ┌──────────────────┐
//!         │  CalendarEvent[] │  (sorted by start)
//!         └──────────────────┘
//! ```
//!
//! The aggregator isolates per-source failures: a broken feed logs a
//! warning and contributes zero events, it never fails the pass.

pub mod aggregate;
pub mod api;
pub mod error;
pub mod fetch;
pub mod ical;

pub use aggregate::{Aggregator, merge_source_results};
pub use api::{CredentialProvider, HttpProviderApi, ProviderApi, ProviderEvent, StaticToken};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use fetch::{FeedFetcher, FetchFeed};
pub use ical::decode_ical;
