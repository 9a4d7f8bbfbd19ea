//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::{Config, VideoConfig};
use crate::geo::GeoResolver;
use crate::session::SessionStore;
use crate::sightings::{load_dataset, DatasetResult, SightingsDataset};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Current sightings dataset, swapped whole on reload
    pub dataset: Arc<RwLock<Arc<SightingsDataset>>>,
    /// File the dataset is (re)loaded from
    pub dataset_path: PathBuf,
    /// Geolocation backend with its cache
    pub geo: Arc<GeoResolver>,
    /// Visitor sessions
    pub sessions: Arc<SessionStore>,
    /// Embedded video panels
    pub videos: Arc<Vec<VideoConfig>>,
    /// Name of the session cookie
    pub cookie_name: Arc<str>,
    /// Add `Secure` to the session cookie
    pub cookie_secure: bool,
    /// Take the visitor address from proxy headers
    pub trust_proxy_headers: bool,
    /// Origins allowed cross-site; empty means none
    pub cors_origins: Arc<Vec<String>>,
    /// Whether the reload endpoint is served
    pub allow_reload: bool,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state from an already loaded dataset
    pub fn new(
        dataset: SightingsDataset,
        geo: Arc<GeoResolver>,
        sessions: Arc<SessionStore>,
        config: &Config,
    ) -> Self {
        let dataset_path = dataset
            .source()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| config.dataset.path.clone());

        Self {
            dataset: Arc::new(RwLock::new(Arc::new(dataset))),
            dataset_path,
            geo,
            sessions,
            videos: Arc::new(config.videos.clone()),
            cookie_name: Arc::from(config.session.cookie_name.as_str()),
            cookie_secure: config.session.cookie_secure,
            trust_proxy_headers: config.server.trust_proxy_headers,
            cors_origins: Arc::new(config.server.cors_origins.clone()),
            allow_reload: config.dataset.allow_reload,
            start_time: Instant::now(),
        }
    }

    /// Snapshot of the current dataset
    ///
    /// Handlers work on the snapshot so a concurrent reload never changes
    /// data halfway through a response.
    pub async fn dataset(&self) -> Arc<SightingsDataset> {
        Arc::clone(&*self.dataset.read().await)
    }

    /// Re-read the dataset file; the old dataset stays on failure
    pub async fn reload_dataset(&self) -> DatasetResult<Arc<SightingsDataset>> {
        let path = self.dataset_path.clone();
        let fresh = tokio::task::spawn_blocking(move || load_dataset(&path))
            .await
            .map_err(|e| crate::sightings::DatasetError::Io {
                path: self.dataset_path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            })??;

        let fresh = Arc::new(fresh);
        *self.dataset.write().await = Arc::clone(&fresh);
        Ok(fresh)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
