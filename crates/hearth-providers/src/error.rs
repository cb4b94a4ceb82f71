//! Error types for calendar pipeline operations.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Network error - connection failed, timeout, DNS resolution, etc.
    Transport,
    /// A dependency answered with a non-2xx HTTP status.
    Upstream,
    /// The credential provider could not supply a bearer token.
    Unauthenticated,
    /// The upstream body could not be parsed.
    InvalidResponse,
    /// Missing or contradictory configuration.
    Configuration,
}

impl ProviderErrorCode {
    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Upstream => "upstream",
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidResponse => "invalid_response",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from fetching or decoding one calendar source.
///
/// The aggregator never propagates these to its caller; they are logged and
/// the failing source contributes zero events.
#[derive(Debug, Error)]
pub struct ProviderError {
    /// The error code categorizing this error.
    code: ProviderErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The upstream HTTP status, for `Upstream` errors.
    status: Option<u16>,
    /// The calendar source that produced this error, when known.
    source_id: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source_id: None,
            source: None,
        }
    }

    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Transport, message)
    }

    /// Creates an upstream error carrying the HTTP status.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(ProviderErrorCode::Upstream, message);
        err.status = Some(status);
        err
    }

    /// Creates an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Unauthenticated, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Configuration, message)
    }

    /// Tags this error with the source it came from.
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Sets the underlying cause for this error.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(cause));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the upstream HTTP status, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the source id, if set.
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref source_id) = self.source_id {
            write!(f, "[{}] ", source_id)?;
        }
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {})", status)?;
        }
        Ok(())
    }
}

/// A specialized Result type for calendar pipeline operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_carries_status() {
        let err = ProviderError::upstream(502, "bad gateway");
        assert_eq!(err.code(), ProviderErrorCode::Upstream);
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.message(), "bad gateway");
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ProviderError::transport("connection refused");
        assert_eq!(err.code(), ProviderErrorCode::Transport);
        assert!(err.status().is_none());
    }

    #[test]
    fn display_includes_source_and_status() {
        let err = ProviderError::upstream(404, "feed not found").with_source_id("trash");
        let display = format!("{}", err);
        assert!(display.contains("[trash]"));
        assert!(display.contains("upstream"));
        assert!(display.contains("404"));
    }

    #[test]
    fn cause_is_chained() {
        use std::error::Error;
        let io_err = std::io::Error::other("broken pipe");
        let err = ProviderError::transport("request failed").with_cause(io_err);
        assert!(err.source().is_some());
    }
}
