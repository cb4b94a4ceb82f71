//! Daemon: configuration, refresh loops, dashboard state.
//!
//! This crate glues the calendar and photo pipelines into the `hearthd`
//! daemon: it loads the TOML configuration, builds the pipelines, and runs
//! one refresh loop per pipeline against a shared snapshot that the
//! display layer reads.

pub mod config;
pub mod error;
pub mod refresh;
pub mod secret;
pub mod service;
pub mod state;

pub use config::{DashboardConfig, PhotoSettings, ProviderSettings, RefreshSettings};
pub use error::{ServerError, ServerResult};
pub use refresh::{RefreshConfig, RefreshLoop};
pub use service::DashboardService;
pub use state::{DashboardState, SharedState, new_shared_state};
