//! Error types for album resolution.

use thiserror::Error;

/// A terminal failure resolving a shared album.
///
/// Unlike calendar source errors, these propagate to the caller, which owns
/// the cache-fallback decision.
#[derive(Debug, Error)]
pub enum AlbumError {
    /// Network-level failure reaching the album backend.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-2xx status, after retries where
    /// they apply.
    #[error("upstream status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The backend body could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AlbumError {
    /// Creates a transport error without an underlying cause.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error wrapping its cause.
    pub fn transport_with<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// Creates an upstream error with the HTTP status and message.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Returns the upstream HTTP status, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for album operations.
pub type AlbumResult<T> = Result<T, AlbumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_carries_status() {
        let err = AlbumError::upstream(403, "come back later");
        assert_eq!(err.status(), Some(403));
        let display = format!("{}", err);
        assert!(display.contains("403"));
        assert!(display.contains("come back later"));
    }

    #[test]
    fn transport_has_no_status() {
        assert!(AlbumError::transport("unreachable").status().is_none());
    }
}
