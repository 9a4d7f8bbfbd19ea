//! UAP Watch Server
//!
//! Run with: cargo run --bin uapwatch
//!
//! # Configuration
//!
//! Read from the first of `$XDG_CONFIG_HOME/uapwatch/config.toml`,
//! `/etc/uapwatch/config.toml` or `./config.toml`, or the file passed as the
//! first argument. Environment variables override file settings:
//! - `UAPWATCH_HOST` / `UAPWATCH_PORT`: Bind address (default: 0.0.0.0:8501)
//! - `UAPWATCH_DATASET`: Sightings CSV (default: uap_sightings_monthly.csv)
//! - `UAPWATCH_GEO_URL` / `UAPWATCH_GEO_TOKEN`: Geolocation service
//! - `UAPWATCH_LOG_LEVEL` / `UAPWATCH_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter directive, wins over the configured level

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uapwatch::api::{serve, AppState};
use uapwatch::config::{Config, ConfigReport, LoggingConfig};
use uapwatch::geo::{GeoResolver, IpInfoClient};
use uapwatch::session::SessionStore;
use uapwatch::sightings::load_dataset;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, report) = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = Config::load_with_env(&path)?;
            let report = ConfigReport {
                loaded_from: Some(path),
                ..Default::default()
            };
            (config, report)
        }
        None => Config::load_default(),
    };

    init_tracing(&config.logging);
    report.log();

    tracing::info!("Starting UAP Watch v{}", env!("CARGO_PKG_VERSION"));

    // A dataset that fails to load aborts startup
    tracing::info!("Dataset: {:?}", config.dataset.path);
    let dataset = load_dataset(&config.dataset.path)?;
    if dataset.is_empty() {
        tracing::warn!("Dataset has no records, month selector will be empty");
    }

    let client = Arc::new(IpInfoClient::new(config.geo.client_config())?);
    tracing::info!(
        "Geolocation via {} (timeout {} ms, cache ttl {} s)",
        config.geo.base_url,
        config.geo.timeout_ms,
        config.geo.cache_ttl_secs
    );
    let geo = Arc::new(GeoResolver::new(client, config.geo.cache_config()));

    let sessions = Arc::new(SessionStore::new(config.session.store_config()));
    let sweep_handle = sessions.start_background_sweep();

    if config.server.trust_proxy_headers {
        tracing::info!("Visitor address taken from proxy headers");
    }
    if config.dataset.allow_reload {
        tracing::warn!("Dataset reload endpoint is enabled");
    }

    let state = AppState::new(dataset, geo, sessions, &config);

    tracing::info!("Starting server on {}", config.server.addr());
    serve(state, &config.server).await?;

    sweep_handle.abort();
    tracing::info!("UAP Watch stopped");

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("uapwatch={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
