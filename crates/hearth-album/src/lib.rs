//! Shared-album photo pipeline: resolution protocol, cache, fallback.
//!
//! [`AlbumClient`] runs the three-step resolution protocol (host discovery,
//! stream listing, asset URL resolution) with transient-403 retries and
//! picks, per photo, the derivative closest to the display size.
//! [`AlbumCache`] keeps the last good photo set per album token, and
//! [`PhotoService`] ties the two together: fresh when possible, cached
//! (however stale) when not, an error only when neither exists.

pub mod cache;
pub mod client;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use cache::{AlbumCache, AlbumCacheEntry};
pub use client::{AlbumClient, AlbumConfig, DEFAULT_ALBUM_HOST, select_derivative};
pub use error::{AlbumError, AlbumResult};
pub use http::{AlbumHttp, AlbumResponse, REDIRECT_HOST_HEADER, ReqwestAlbumHttp};
pub use service::PhotoService;
pub use types::{AssetLocation, AssetUrlMap, Derivative, PhotoDescriptor, StreamListing};
