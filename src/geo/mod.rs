//! Visitor Geolocation
//!
//! Resolves a visitor's approximate location from their network address.
//!
//! - **client**: ipinfo-compatible HTTP backend with explicit timeouts
//! - **cache**: per-address TTL cache in front of any backend
//! - **error**: typed lookup failures; the caller picks the fallback

pub mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use cache::{GeoCacheConfig, GeoResolver};
pub use client::{is_public, IpInfoClient, IpInfoConfig};
pub use error::GeoLookupError;
pub use types::VisitorGeo;

use async_trait::async_trait;
use std::net::IpAddr;

/// A geolocation backend
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Locate `ip`, or the server itself when `ip` is `None`
    async fn lookup(&self, ip: Option<IpAddr>) -> Result<VisitorGeo, GeoLookupError>;
}
