//! Daemon configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/hearth/config.toml` by default:
//!
//! ```toml
//! [[calendars]]
//! id = "personal"
//! name = "Personal"
//! color = "#3f51b5"
//! ical_url = "https://calendar.example.com/personal.ics"
//!
//! [[calendars]]
//! id = "work"
//! name = "Work"
//! color = "#003a9b"
//! provider_calendar_id = "work@example.com"
//!
//! [provider]
//! base_url = "https://calendar-api.example.com"
//! bearer_token = "env::HEARTH_CALENDAR_TOKEN"
//!
//! [photos]
//! album_token = "B0a1b2c3d4"
//! ```
//!
//! The provider `bearer_token` supports `env::VAR` secret references.

use std::path::PathBuf;

use hearth_core::CalendarSource;
use serde::{Deserialize, Serialize};

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Calendar sources to aggregate.
    pub calendars: Vec<CalendarSource>,

    /// Photo settings.
    pub photos: PhotoSettings,

    /// Structured calendar provider settings, when any source uses
    /// `provider_calendar_id`.
    pub provider: Option<ProviderSettings>,

    /// Refresh cadence.
    pub refresh: RefreshSettings,
}

/// Shared-album photo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSettings {
    /// Album token from the shared-album URL. Absent disables the photo
    /// pipeline.
    pub album_token: Option<String>,

    /// Advisory cache TTL in seconds; past it, fallback hits are logged as
    /// stale but still served.
    pub advisory_ttl_secs: u64,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            album_token: None,
            advisory_ttl_secs: 3600,
        }
    }
}

/// Structured calendar provider connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API base URL.
    pub base_url: String,

    /// Bearer token value or `env::VAR` reference.
    pub bearer_token: String,
}

/// Refresh cadence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Seconds between calendar aggregation passes.
    pub calendar_secs: u64,

    /// Seconds between photo album refreshes.
    pub photo_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            calendar_secs: 300,
            photo_secs: 3600,
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from the default path, or defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hearth")
    }
}
