//! hearthd entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use hearth_album::{AlbumCache, AlbumClient, AlbumConfig, PhotoService, ReqwestAlbumHttp};
use hearth_core::{TracingConfig, init_tracing};
use hearth_providers::{Aggregator, FeedFetcher, HttpProviderApi, StaticToken};
use hearth_server::config::DashboardConfig;
use hearth_server::error::{ServerError, ServerResult};
use hearth_server::refresh::{RefreshConfig, RefreshLoop};
use hearth_server::secret;
use hearth_server::service::DashboardService;
use hearth_server::state::new_shared_state;

#[derive(Parser)]
#[command(name = "hearthd", about = "Ambient display data daemon", version)]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/hearth/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Refresh once, print the snapshot as JSON, and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    let config = if let Some(ref path) = cli.config {
        DashboardConfig::load_from(path).map_err(ServerError::Config)?
    } else {
        DashboardConfig::load().map_err(ServerError::Config)?
    };

    let service = Arc::new(build_service(&config)?);

    if cli.once {
        refresh_once(&service).await;
        return Ok(());
    }

    let calendar_loop = RefreshLoop::new(
        "calendar",
        RefreshConfig::new(Duration::from_secs(config.refresh.calendar_secs)),
    );
    let photo_loop = RefreshLoop::new(
        "photos",
        RefreshConfig::new(Duration::from_secs(config.refresh.photo_secs)),
    );

    let calendar_service = service.clone();
    let photo_service = service.clone();

    tokio::select! {
        _ = calendar_loop.run(move || {
            let service = calendar_service.clone();
            async move { service.refresh_calendars().await }
        }) => {}
        _ = photo_loop.run(move || {
            let service = photo_service.clone();
            async move { service.refresh_photos().await }
        }) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    Ok(())
}

/// Builds the dashboard service from configuration.
fn build_service(config: &DashboardConfig) -> ServerResult<DashboardService> {
    let fetcher = Arc::new(FeedFetcher::new()?);
    let mut aggregator = Aggregator::new(fetcher);

    if let Some(ref provider) = config.provider {
        let token = secret::resolve(&provider.bearer_token).map_err(ServerError::Config)?;
        let api = HttpProviderApi::new(&provider.base_url, Arc::new(StaticToken::new(token)))?;
        aggregator = aggregator.with_provider_api(Arc::new(api));
    }

    let state = new_shared_state();
    let mut service = DashboardService::new(aggregator, config.calendars.clone(), state);

    if let Some(ref album_token) = config.photos.album_token {
        let http = Arc::new(ReqwestAlbumHttp::new()?);
        let client = AlbumClient::new(http, AlbumConfig::default());
        let cache = AlbumCache::new(Duration::from_secs(config.photos.advisory_ttl_secs));
        service = service.with_photos(PhotoService::new(client, cache), album_token.clone());
    }

    Ok(service)
}

/// One-shot mode: refresh both pipelines and print the snapshot.
async fn refresh_once(service: &DashboardService) {
    if let Err(e) = service.refresh_calendars().await {
        tracing::warn!(error = %e, "calendar refresh failed");
    }
    if let Err(e) = service.refresh_photos().await {
        tracing::warn!(error = %e, "photo refresh failed");
    }

    let state = service.state();
    let snapshot = serde_json::json!({
        "events": state.events().await,
        "photos": state.photos().await,
    });

    // One-shot output goes to stdout, not the log stream.
    println!("{}", serde_json::to_string_pretty(&snapshot).unwrap_or_default());
}
