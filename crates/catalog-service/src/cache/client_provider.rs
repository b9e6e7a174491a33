//! Lazily created, process-wide cache connection handles.

use super::{CacheConnection, CacheError, RedisConnectionFactory};
use async_trait::async_trait;
use catalog_config::{AccessMode, RedisConfig};
use catalog_core::{HealthCheck, HealthStatus};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Opens a connection handle for an access mode.
pub trait ConnectionFactory: Send + Sync {
    /// Builds the handle. Called at most once per mode by a provider.
    fn connect(&self, mode: AccessMode) -> Result<Arc<dyn CacheConnection>, CacheError>;
}

/// Owns one connection handle per [`AccessMode`].
///
/// The first request for a mode builds its handle; later requests share it.
/// Lookups are lock-free once a handle exists. Construction holds a mutex
/// and re-checks the slot, so concurrent first use still builds exactly one
/// handle per mode.
///
/// The default provider has no factory and fails every request with
/// [`CacheError::NotConfigured`].
#[derive(Default)]
pub struct CacheClientProvider {
    factory: Option<Arc<dyn ConnectionFactory>>,
    read: OnceLock<Arc<dyn CacheConnection>>,
    write: OnceLock<Arc<dyn CacheConnection>>,
    init_lock: Mutex<()>,
}

impl CacheClientProvider {
    /// Creates a provider that builds handles with `factory`.
    #[must_use]
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            factory: Some(factory),
            ..Self::default()
        }
    }

    /// Creates a provider backed by Redis connection pools.
    #[must_use]
    pub fn from_config(config: &RedisConfig) -> Self {
        Self::new(Arc::new(RedisConnectionFactory::new(config.clone())))
    }

    /// Returns true if handles can be built.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.factory.is_some()
    }

    /// Returns the shared handle for `mode`, building it on first use.
    pub fn client(&self, mode: AccessMode) -> Result<Arc<dyn CacheConnection>, CacheError> {
        let slot = self.slot(mode);
        if let Some(client) = slot.get() {
            return Ok(Arc::clone(client));
        }

        let factory = self
            .factory
            .as_ref()
            .ok_or(CacheError::NotConfigured(mode))?;

        let _guard = self.init_lock.lock();
        if let Some(client) = slot.get() {
            return Ok(Arc::clone(client));
        }

        let client = factory.connect(mode)?;
        // Cannot already be set: writers hold `init_lock`.
        let _ = slot.set(Arc::clone(&client));
        info!(mode = %mode, "Cache client created");
        Ok(client)
    }

    fn slot(&self, mode: AccessMode) -> &OnceLock<Arc<dyn CacheConnection>> {
        match mode {
            AccessMode::Read => &self.read,
            AccessMode::Write => &self.write,
        }
    }
}

impl std::fmt::Debug for CacheClientProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheClientProvider")
            .field("configured", &self.is_configured())
            .field("read", &self.read.get().is_some())
            .field("write", &self.write.get().is_some())
            .finish()
    }
}

/// Cache reachability. An unreachable cache only degrades the service.
#[async_trait]
impl HealthCheck for CacheClientProvider {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.is_configured() {
            return HealthStatus::Healthy;
        }
        let ping = async { self.client(AccessMode::Read)?.ping().await };
        match ping.await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_unconfigured_provider_fails() {
        let provider = CacheClientProvider::default();
        assert!(!provider.is_configured());
        let err = provider.client(AccessMode::Read).err().unwrap();
        assert!(matches!(err, CacheError::NotConfigured(AccessMode::Read)));
    }

    #[test]
    fn test_handle_is_memoized_per_mode() {
        let cache = InMemoryCache::new();
        let provider = CacheClientProvider::new(Arc::new(cache.clone()));

        let r1 = provider.client(AccessMode::Read).unwrap();
        let r2 = provider.client(AccessMode::Read).unwrap();
        let w1 = provider.client(AccessMode::Write).unwrap();

        assert!(Arc::ptr_eq(&r1, &r2));
        assert!(!Arc::ptr_eq(&r1, &w1));
        assert_eq!(cache.connects(), 2);
    }

    #[test]
    fn test_concurrent_first_use_builds_one_handle() {
        let cache = InMemoryCache::new();
        let provider = Arc::new(CacheClientProvider::new(Arc::new(cache.clone())));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let provider = Arc::clone(&provider);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    provider.client(AccessMode::Write).unwrap()
                })
            })
            .collect();

        let clients: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(clients.iter().all(|c| Arc::ptr_eq(c, &clients[0])));
        assert_eq!(cache.connects(), 1);
    }

    #[tokio::test]
    async fn test_health_check() {
        let cache = InMemoryCache::new();
        let provider = CacheClientProvider::new(Arc::new(cache.clone()));
        assert_eq!(provider.check().await, HealthStatus::Healthy);

        cache.set_unavailable(true);
        assert!(matches!(provider.check().await, HealthStatus::Degraded(_)));

        assert_eq!(
            CacheClientProvider::default().check().await,
            HealthStatus::Healthy
        );
    }
}
