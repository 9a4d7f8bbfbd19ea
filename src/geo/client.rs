//! ipinfo-compatible HTTP client
//!
//! Resolves a visitor address with `GET {base_url}/{ip}/json`, or the
//! server's own address with `GET {base_url}/json` when the visitor address
//! is not publicly routable.

use super::error::GeoLookupError;
use super::types::{VisitorGeo, UNKNOWN};
use super::GeoLookup;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Configuration for the geolocation client
#[derive(Debug, Clone)]
pub struct IpInfoConfig {
    /// Base URL of the service, without trailing slash
    pub base_url: String,
    /// Optional API token sent as a bearer token
    pub token: Option<String>,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Honor HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for IpInfoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ipinfo.io".to_string(),
            token: None,
            timeout_ms: 3000,
            connect_timeout_ms: 1500,
            use_system_proxy: true,
        }
    }
}

/// HTTP geolocation client
pub struct IpInfoClient {
    client: Client,
    config: IpInfoConfig,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    ip: Option<String>,
    country: Option<String>,
    city: Option<String>,
}

impl IpInfoClient {
    /// Create a client with the given configuration
    pub fn new(config: IpInfoConfig) -> Result<Self, GeoLookupError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!("uapwatch/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &IpInfoConfig {
        &self.config
    }

    /// URL queried for a visitor address
    pub fn lookup_url(&self, ip: Option<IpAddr>) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match ip.filter(is_public) {
            Some(ip) => format!("{}/{}/json", base, ip),
            None => format!("{}/json", base),
        }
    }
}

#[async_trait]
impl GeoLookup for IpInfoClient {
    fn name(&self) -> &str {
        "ipinfo"
    }

    async fn lookup(&self, ip: Option<IpAddr>) -> Result<VisitorGeo, GeoLookupError> {
        let url = self.lookup_url(ip);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeoLookupError::Status {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await.map_err(classify)?;
        let parsed: IpInfoResponse =
            serde_json::from_str(&body).map_err(|e| GeoLookupError::Decode(e.to_string()))?;

        let fallback_ip = ip.filter(is_public).map(|ip| ip.to_string());

        Ok(VisitorGeo {
            ip: parsed
                .ip
                .or(fallback_ip)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            country: parsed.country.unwrap_or_else(|| UNKNOWN.to_string()),
            city: parsed.city.unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }
}

fn classify(err: reqwest::Error) -> GeoLookupError {
    if err.is_timeout() {
        GeoLookupError::Timeout
    } else if err.is_connect() {
        GeoLookupError::Unavailable(err.to_string())
    } else {
        GeoLookupError::Request(err)
    }
}

/// Whether the service can meaningfully geolocate `ip`
pub fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation())
        }
        IpAddr::V6(v6) => {
            let unique_local = (v6.segments()[0] & 0xfe00) == 0xfc00;
            let link_local = (v6.segments()[0] & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}
