//! Redis-backed cache-aside layer.

mod cache_aside;
mod cache_interface;
mod cache_keys;
mod client_provider;
pub mod codec;
mod error;
mod guard;
#[cfg(any(test, feature = "test-utils"))]
mod memory_cache;
mod redis_cache;

pub use cache_aside::{CacheAside, CacheAsideParameters};
pub use cache_interface::{CacheConnection, CacheExt, CacheInterface};
pub use cache_keys::{CacheKey, CacheKeys, DEFAULT_PREFIX};
pub use client_provider::{CacheClientProvider, ConnectionFactory};
pub use codec::Cacheable;
pub use error::CacheError;
pub use guard::fail_open;
#[cfg(any(test, feature = "test-utils"))]
pub use memory_cache::InMemoryCache;
pub use redis_cache::{RedisConnection, RedisConnectionFactory};
