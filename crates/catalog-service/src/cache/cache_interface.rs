//! Cache traits.
//!
//! [`CacheConnection`] is the transport seam: one shared handle per access
//! mode, issuing raw string commands. [`CacheInterface`] is the guarded,
//! injectable cache-aside API the service uses, and [`CacheExt`] adds the
//! typed `get_cached`/`set_cached` on top of it.

use super::{codec, CacheError, CacheKey, Cacheable};
use async_trait::async_trait;
use catalog_core::CatalogResult;
use shaku::Interface;
use std::time::Duration;

/// A connection handle to the key-value store.
///
/// Implementations must be safe for concurrent use without external locking.
#[async_trait]
pub trait CacheConnection: Send + Sync {
    /// `GET key`.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// `SET key value [EX ttl]`.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Every key matching a glob pattern, gathered with cursor-based `SCAN`.
    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// `DEL key`, returning the number of keys removed.
    async fn del(&self, key: &str) -> Result<u64, CacheError>;

    /// `PING`.
    async fn ping(&self) -> Result<(), CacheError>;
}

/// Cache-aside operations.
///
/// Every method is fail-open: if the cache is unreachable reads report a
/// miss, writes report `false` and invalidation reports `0`. Errors that
/// remain are codec or configuration defects.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Raw cached text for `key`, `None` on a miss.
    async fn get_raw(&self, key: &CacheKey) -> CatalogResult<Option<String>>;

    /// Stores raw text, optionally with an expiry. Returns whether it was stored.
    async fn set_raw(&self, key: &CacheKey, value: &str, ttl: Option<Duration>)
        -> CatalogResult<bool>;

    /// Deletes every key matching `pattern`, returning how many were removed.
    ///
    /// A pattern without glob metacharacters is deleted directly. Deletion
    /// is key by key and not atomic.
    async fn invalidate(&self, pattern: &str) -> CatalogResult<u64>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Typed helpers over [`CacheInterface`].
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Decoded cached value for `key`, `None` on a miss.
    async fn get_cached<T: Cacheable>(&self, key: &CacheKey) -> CatalogResult<Option<T>> {
        let raw = self.get_raw(key).await?;
        Ok(codec::decode(raw.as_deref())?)
    }

    /// Encodes and stores a value. Returns whether it was stored.
    async fn set_cached<T: Cacheable>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Option<Duration>,
    ) -> CatalogResult<bool> {
        let text = codec::encode(value)?;
        self.set_raw(key, &text, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
