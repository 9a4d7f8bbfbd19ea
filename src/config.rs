//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::geo::{GeoCacheConfig, IpInfoConfig};
use crate::session::SessionStoreConfig;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub geo: GeoConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default = "default_videos")]
    pub videos: Vec<VideoConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Honor `X-Forwarded-For` / `X-Real-IP`; only safe behind a proxy that sets them
    #[serde(default)]
    pub trust_proxy_headers: bool,

    /// Origins allowed to call the API cross-site; empty means same-origin only
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            trust_proxy_headers: false,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Sightings dataset location
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    /// Expose `POST /api/v1/dataset/reload`
    #[serde(default)]
    pub allow_reload: bool,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("uap_sightings_monthly.csv")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            allow_reload: false,
        }
    }
}

/// Geolocation service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_geo_url")]
    pub base_url: String,

    pub token: Option<String>,

    #[serde(default = "default_geo_timeout")]
    pub timeout_ms: u64,

    #[serde(default = "default_geo_connect_timeout")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_geo_url() -> String {
    "https://ipinfo.io".to_string()
}

fn default_geo_timeout() -> u64 {
    3000
}

fn default_geo_connect_timeout() -> u64 {
    1500
}

fn default_cache_ttl() -> u64 {
    3600 // 1 hour
}

fn default_cache_capacity() -> usize {
    1024
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: default_geo_url(),
            token: None,
            timeout_ms: default_geo_timeout(),
            connect_timeout_ms: default_geo_connect_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl GeoConfig {
    pub fn client_config(&self) -> IpInfoConfig {
        IpInfoConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            timeout_ms: self.timeout_ms,
            connect_timeout_ms: self.connect_timeout_ms,
            use_system_proxy: true,
        }
    }

    pub fn cache_config(&self) -> GeoCacheConfig {
        GeoCacheConfig {
            ttl: Duration::from_secs(self.cache_ttl_secs),
            capacity: self.cache_capacity,
        }
    }
}

/// Visitor session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Mark the cookie `Secure`; enable when served over HTTPS
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_cookie_name() -> String {
    "uapwatch_session".to_string()
}

fn default_idle_timeout() -> u64 {
    1800 // 30 minutes
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            max_sessions: default_max_sessions(),
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    pub fn store_config(&self) -> SessionStoreConfig {
        SessionStoreConfig {
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs.max(1)),
            max_sessions: self.max_sessions.max(1),
        }
    }
}

/// An embedded video panel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoConfig {
    pub title: String,
    pub url: String,
}

fn default_videos() -> Vec<VideoConfig> {
    [
        ("USA Pentagon UAP Video 1", "https://www.youtube.com/watch?v=VUrTsrhVce4"),
        ("USA Pentagon UAP Video 2", "https://www.youtube.com/watch?v=LN22jK34usA"),
        ("USA Pentagon UAP Video 3", "https://www.youtube.com/watch?v=lWLZgnmRDs4"),
    ]
    .into_iter()
    .map(|(title, url)| VideoConfig {
        title: title.to_string(),
        url: url.to_string(),
    })
    .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Runs before logging is set up, so what happened is returned as a
    /// [`ConfigReport`] for the caller to log once a subscriber exists.
    pub fn load_default() -> (Self, ConfigReport) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("uapwatch").join("config.toml")),
            Some(PathBuf::from("/etc/uapwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file in `paths` that parses
    pub fn load_first(paths: &[PathBuf]) -> (Self, ConfigReport) {
        let mut report = ConfigReport::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    report.loaded_from = Some(path.clone());
                    return (config, report);
                }
                Err(e) => report.rejected.push(e),
            }
        }

        (Self::from_env(), report)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("UAPWATCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("UAPWATCH_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(trust) = std::env::var("UAPWATCH_TRUST_PROXY_HEADERS") {
            if let Ok(t) = trust.parse() {
                self.server.trust_proxy_headers = t;
            }
        }

        if let Ok(path) = std::env::var("UAPWATCH_DATASET") {
            self.dataset.path = PathBuf::from(path);
        }

        // Geolocation overrides
        if let Ok(url) = std::env::var("UAPWATCH_GEO_URL") {
            self.geo.base_url = url;
        }
        if let Ok(token) = std::env::var("UAPWATCH_GEO_TOKEN") {
            self.geo.token = Some(token);
        }

        // Logging overrides
        if let Ok(level) = std::env::var("UAPWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("UAPWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            dataset: DatasetConfig::default(),
            geo: GeoConfig::default(),
            session: SessionConfig::default(),
            videos: default_videos(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where [`Config::load_default`] got its settings from
#[derive(Debug, Default)]
pub struct ConfigReport {
    /// File the config was read from; `None` means built-in defaults
    pub loaded_from: Option<PathBuf>,
    /// Files that exist but failed to load, in search order
    pub rejected: Vec<ConfigError>,
}

impl ConfigReport {
    /// Emit the report through `tracing`
    pub fn log(&self) {
        for error in &self.rejected {
            tracing::warn!("Skipping config file: {}", error);
        }
        match &self.loaded_from {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# UAP Watch Configuration
#
# Environment variables override these settings:
# - UAPWATCH_HOST
# - UAPWATCH_PORT
# - UAPWATCH_TRUST_PROXY_HEADERS
# - UAPWATCH_DATASET
# - UAPWATCH_GEO_URL
# - UAPWATCH_GEO_TOKEN
# - UAPWATCH_LOG_LEVEL
# - UAPWATCH_LOG_FORMAT

[server]
# Dashboard host
host = "0.0.0.0"

# Dashboard port
port = 8501

# Request timeout in seconds
request_timeout_secs = 30

# Take the visitor address from X-Forwarded-For / X-Real-IP.
# Only enable behind a reverse proxy that overwrites these headers.
trust_proxy_headers = false

# Origins allowed to call the API from other sites (empty: same-origin only)
cors_origins = []

[dataset]
# CSV with columns Month,Country,Latitude,Longitude,Sightings
path = "uap_sightings_monthly.csv"

# Expose POST /api/v1/dataset/reload (unauthenticated, keep off on public hosts)
allow_reload = false

[geo]
# ipinfo-compatible geolocation service
base_url = "https://ipinfo.io"

# Optional API token
# token = ""

# Lookup timeouts (ms)
timeout_ms = 3000
connect_timeout_ms = 1500

# How long a visitor's location is cached (seconds)
cache_ttl_secs = 3600

# Maximum cached visitor addresses
cache_capacity = 1024

[session]
# Cookie carrying the session id
cookie_name = "uapwatch_session"

# Drop sessions idle for this long (seconds)
idle_timeout_secs = 1800

# How often idle sessions are swept (seconds)
sweep_interval_secs = 60

# Maximum concurrent sessions
max_sessions = 10000

# Send the cookie only over HTTPS
cookie_secure = false

[[videos]]
title = "USA Pentagon UAP Video 1"
url = "https://www.youtube.com/watch?v=VUrTsrhVce4"

[[videos]]
title = "USA Pentagon UAP Video 2"
url = "https://www.youtube.com/watch?v=LN22jK34usA"

[[videos]]
title = "USA Pentagon UAP Video 3"
url = "https://www.youtube.com/watch?v=lWLZgnmRDs4"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
