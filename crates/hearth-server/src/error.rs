//! Daemon error type.

use thiserror::Error;

use hearth_album::AlbumError;
use hearth_core::TracingError;
use hearth_providers::ProviderError;

/// Errors that abort daemon startup.
///
/// Once the refresh loops are running, failures degrade the snapshot and
/// are logged instead of raised; nothing here is reachable from steady
/// state.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or is contradictory.
    #[error("configuration error: {0}")]
    Config(String),

    /// Calendar pipeline construction failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Photo pipeline construction failed.
    #[error(transparent)]
    Album(#[from] AlbumError),

    /// Tracing could not be initialized.
    #[error(transparent)]
    Tracing(#[from] TracingError),
}

/// A specialized Result type for daemon operations.
pub type ServerResult<T> = Result<T, ServerError>;
