//! Geolocation Cache
//!
//! Memoizes successful lookups per visitor address for a bounded time.
//! Failed lookups are never cached so the next visit retries.

use super::error::GeoLookupError;
use super::types::VisitorGeo;
use super::GeoLookup;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct GeoCacheConfig {
    /// How long a cached location stays valid
    pub ttl: Duration,
    /// Maximum number of cached addresses
    pub capacity: usize,
}

impl Default for GeoCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            capacity: 1024,
        }
    }
}

struct CacheEntry {
    geo: VisitorGeo,
    fetched_at: Instant,
}

/// Lookup backend wrapped with a per-address TTL cache
///
/// `None` (unknown visitor address) is its own key: every visitor without
/// a usable address shares the server's self lookup.
pub struct GeoResolver {
    backend: Arc<dyn GeoLookup>,
    entries: RwLock<HashMap<Option<IpAddr>, CacheEntry>>,
    config: GeoCacheConfig,
}

impl GeoResolver {
    pub fn new(backend: Arc<dyn GeoLookup>, config: GeoCacheConfig) -> Self {
        Self {
            backend,
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Resolve a visitor address, consulting the cache first
    pub async fn resolve(&self, ip: Option<IpAddr>) -> Result<VisitorGeo, GeoLookupError> {
        if let Some(geo) = self.cached(&ip).await {
            tracing::debug!(ip = ?ip, "Geolocation cache hit");
            return Ok(geo);
        }

        let geo = self.backend.lookup(ip).await?;

        tracing::debug!(
            ip = ?ip,
            backend = self.backend.name(),
            country = %geo.country,
            "Geolocation resolved"
        );

        self.insert(ip, geo.clone()).await;
        Ok(geo)
    }

    async fn cached(&self, ip: &Option<IpAddr>) -> Option<VisitorGeo> {
        let entries = self.entries.read().await;
        entries
            .get(ip)
            .filter(|e| e.fetched_at.elapsed() < self.config.ttl)
            .map(|e| e.geo.clone())
    }

    async fn insert(&self, ip: Option<IpAddr>, geo: VisitorGeo) {
        if self.config.capacity == 0 {
            return;
        }

        let mut entries = self.entries.write().await;
        let ttl = self.config.ttl;
        entries.retain(|_, e| e.fetched_at.elapsed() < ttl);

        if entries.len() >= self.config.capacity && !entries.contains_key(&ip) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.fetched_at)
                .map(|(k, _)| *k);
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }

        entries.insert(
            ip,
            CacheEntry {
                geo,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Number of cached addresses
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that counts calls and fails on demand
    struct CountingLookup {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLookup {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeoLookup for CountingLookup {
        fn name(&self) -> &str {
            "counting"
        }

        async fn lookup(&self, ip: Option<IpAddr>) -> Result<VisitorGeo, GeoLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GeoLookupError::Timeout);
            }
            let ip = ip.map(|i| i.to_string()).unwrap_or_else(|| "self".to_string());
            Ok(VisitorGeo::new(ip, "US", "Denver"))
        }
    }

    fn resolver(backend: Arc<CountingLookup>, ttl_ms: u64, capacity: usize) -> GeoResolver {
        GeoResolver::new(
            backend,
            GeoCacheConfig {
                ttl: Duration::from_millis(ttl_ms),
                capacity,
            },
        )
    }

    #[tokio::test]
    async fn test_repeat_lookup_is_cached() {
        let backend = CountingLookup::new(false);
        let resolver = resolver(Arc::clone(&backend), 60_000, 16);
        let ip: IpAddr = "81.2.69.160".parse().unwrap();

        let first = resolver.resolve(Some(ip)).await.unwrap();
        let second = resolver.resolve(Some(ip)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_is_keyed_by_visitor() {
        let backend = CountingLookup::new(false);
        let resolver = resolver(Arc::clone(&backend), 60_000, 16);

        let a = resolver.resolve(Some("81.2.69.160".parse().unwrap())).await.unwrap();
        let b = resolver.resolve(Some("81.2.69.161".parse().unwrap())).await.unwrap();

        assert_ne!(a.ip, b.ip);
        assert_eq!(backend.calls(), 2);
        assert_eq!(resolver.len().await, 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let backend = CountingLookup::new(false);
        let resolver = resolver(Arc::clone(&backend), 20, 16);

        resolver.resolve(None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        resolver.resolve(None).await.unwrap();

        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let backend = CountingLookup::new(true);
        let resolver = resolver(Arc::clone(&backend), 60_000, 16);

        assert!(matches!(resolver.resolve(None).await, Err(GeoLookupError::Timeout)));
        assert!(matches!(resolver.resolve(None).await, Err(GeoLookupError::Timeout)));

        assert_eq!(backend.calls(), 2);
        assert!(resolver.is_empty().await);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let backend = CountingLookup::new(false);
        let resolver = resolver(Arc::clone(&backend), 60_000, 2);
        let first: IpAddr = "81.2.69.1".parse().unwrap();

        resolver.resolve(Some(first)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        resolver.resolve(Some("81.2.69.2".parse().unwrap())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        resolver.resolve(Some("81.2.69.3".parse().unwrap())).await.unwrap();

        assert_eq!(resolver.len().await, 2);

        // evicted, so this goes back to the backend
        resolver.resolve(Some(first)).await.unwrap();
        assert_eq!(backend.calls(), 4);
    }
}
