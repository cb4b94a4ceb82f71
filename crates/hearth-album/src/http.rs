//! HTTP transport seam for the album backend.
//!
//! The resolution protocol is three POSTs against a shared-album backend.
//! Putting the transport behind an object-safe trait keeps the protocol
//! sequencing and retry policy testable with scripted fakes.

use std::time::Duration;

use hearth_core::BoxFuture;
use tracing::trace;

use crate::error::{AlbumError, AlbumResult};

/// Header carrying the region-specific redirect host on discovery.
pub const REDIRECT_HOST_HEADER: &str = "X-Apple-MMe-Host";

/// Origin the backend expects on album requests.
const ALBUM_ORIGIN: &str = "https://www.icloud.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One response from the album backend, reduced to what the protocol
/// consumes.
#[derive(Debug, Clone)]
pub struct AlbumResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the redirect-host header, if present.
    pub redirect_host: Option<String>,
    /// Response body text.
    pub body: String,
}

impl AlbumResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Object-safe POST transport to the album backend.
pub trait AlbumHttp: Send + Sync {
    /// POSTs a JSON value to `url` and returns the reduced response.
    ///
    /// Only transport-level failures are errors here; non-2xx statuses are
    /// returned as responses so callers can apply their retry policy.
    fn post<'a>(
        &'a self,
        url: &'a str,
        body: serde_json::Value,
    ) -> BoxFuture<'a, AlbumResult<AlbumResponse>>;
}

/// Reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestAlbumHttp {
    client: reqwest::Client,
}

impl ReqwestAlbumHttp {
    /// Creates a transport with the default timeout.
    pub fn new() -> AlbumResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| AlbumError::transport_with("failed to create HTTP client", e))?;
        Ok(Self { client })
    }

    async fn post_json(&self, url: &str, body: serde_json::Value) -> AlbumResult<AlbumResponse> {
        trace!(url = %url, "posting to album backend");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "text/plain")
            .header("Origin", ALBUM_ORIGIN)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AlbumError::transport_with("request timeout", e)
                } else {
                    AlbumError::transport_with("request failed", e)
                }
            })?;

        let status = response.status().as_u16();
        let redirect_host = response
            .headers()
            .get(REDIRECT_HOST_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .text()
            .await
            .map_err(|e| AlbumError::transport_with("failed to read response body", e))?;

        Ok(AlbumResponse {
            status,
            redirect_host,
            body,
        })
    }
}

impl AlbumHttp for ReqwestAlbumHttp {
    fn post<'a>(
        &'a self,
        url: &'a str,
        body: serde_json::Value,
    ) -> BoxFuture<'a, AlbumResult<AlbumResponse>> {
        Box::pin(self.post_json(url, body))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back a scripted sequence of responses, recording each request.
    pub(crate) struct ScriptedHttp {
        responses: Mutex<VecDeque<AlbumResult<AlbumResponse>>>,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl ScriptedHttp {
        pub(crate) fn new(responses: Vec<AlbumResult<AlbumResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn ok(status: u16, body: &str) -> AlbumResult<AlbumResponse> {
            Ok(AlbumResponse {
                status,
                redirect_host: None,
                body: body.to_string(),
            })
        }

        pub(crate) fn redirect(host: &str) -> AlbumResult<AlbumResponse> {
            Ok(AlbumResponse {
                status: 200,
                redirect_host: Some(host.to_string()),
                body: String::new(),
            })
        }

        pub(crate) fn request_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl AlbumHttp for ScriptedHttp {
        fn post<'a>(
            &'a self,
            url: &'a str,
            _body: serde_json::Value,
        ) -> BoxFuture<'a, AlbumResult<AlbumResponse>> {
            self.requests.lock().unwrap().push(url.to_string());
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AlbumError::transport("script exhausted")));
            Box::pin(async move { next })
        }
    }
}
