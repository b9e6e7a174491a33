//! Cache-aside operations over the shared client provider.

use super::{fail_open, CacheClientProvider, CacheInterface, CacheKey};
use async_trait::async_trait;
use catalog_config::AccessMode;
use catalog_core::CatalogResult;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Guarded cache operations.
///
/// Reads go through the read-mode client, writes and invalidation through
/// the write-mode client. Each call is wrapped in [`fail_open`]. When caching
/// is disabled nothing touches the provider.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct CacheAside {
    provider: Arc<CacheClientProvider>,
    #[shaku(default = true)]
    enabled: bool,
}

impl CacheAside {
    /// Creates cache-aside operations over `provider`.
    #[must_use]
    pub fn new(provider: Arc<CacheClientProvider>) -> Self {
        Self {
            provider,
            enabled: true,
        }
    }

    /// Creates a no-op cache (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            provider: Arc::new(CacheClientProvider::default()),
            enabled: false,
        }
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[async_trait]
impl CacheInterface for CacheAside {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn get_raw(&self, key: &CacheKey) -> CatalogResult<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let value = fail_open("get_cached", None, async {
            self.provider.client(AccessMode::Read)?.get(key.as_str()).await
        })
        .await?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set_raw(
        &self,
        key: &CacheKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> CatalogResult<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let stored = fail_open("set_cached", false, async {
            self.provider
                .client(AccessMode::Write)?
                .set(key.as_str(), value, ttl)
                .await?;
            Ok(true)
        })
        .await?;

        if stored {
            debug!("Cached key '{}' with TTL {:?}", key, ttl);
        }
        Ok(stored)
    }

    async fn invalidate(&self, pattern: &str) -> CatalogResult<u64> {
        if !self.enabled {
            return Ok(0);
        }

        let deleted = fail_open("invalidate", 0, async {
            let client = self.provider.client(AccessMode::Write)?;
            if !is_glob(pattern) {
                return client.del(pattern).await;
            }

            let mut deleted = 0;
            for key in client.scan(pattern).await? {
                deleted += client.del(&key).await?;
            }
            Ok(deleted)
        })
        .await?;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }
}
