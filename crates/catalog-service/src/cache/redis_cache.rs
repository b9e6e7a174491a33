//! Redis transport.

use super::{CacheConnection, CacheError, ConnectionFactory};
use async_trait::async_trait;
use catalog_config::{AccessMode, RedisConfig};
use deadpool_redis::redis::{self, AsyncCommands, RedisResult};
use deadpool_redis::{Config, Pool, Runtime};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Keys requested per `SCAN` round trip.
const SCAN_COUNT: usize = 100;

/// A pooled Redis connection handle for one access mode.
///
/// Pool checkout and connection establishment are bounded by the connect
/// timeout, each command by the command timeout.
pub struct RedisConnection {
    pool: Pool,
    command_timeout: Duration,
}

impl RedisConnection {
    /// Builds a connection pool for `url`. No connection is opened until the
    /// first command.
    pub fn new(
        url: &str,
        pool_size: usize,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, CacheError> {
        let pool = Config::from_url(url)
            .builder()
            .map_err(|e| CacheError::Config(format!("Invalid Redis config: {}", e)))?
            .max_size(pool_size)
            .wait_timeout(Some(connect_timeout))
            .create_timeout(Some(connect_timeout))
            .recycle_timeout(Some(connect_timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| CacheError::Config(format!("Failed to create pool: {}", e)))?;

        Ok(Self {
            pool,
            command_timeout,
        })
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, CacheError> {
        Ok(self.pool.get().await?)
    }

    async fn bounded<T, F>(&self, command: F) -> Result<T, CacheError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout(format!(
                "command exceeded {}ms",
                self.command_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl CacheConnection for RedisConnection {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = self.bounded(conn.get(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        match ttl {
            Some(ttl) => {
                let secs = ttl.as_secs().max(1);
                self.bounded::<(), _>(conn.set_ex(key, value, secs)).await?;
            }
            None => {
                self.bounded::<(), _>(conn.set(key, value)).await?;
            }
        }
        Ok(())
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn().await?;
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = self
                .bounded(
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_COUNT)
                        .query_async(&mut conn),
                )
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("SCAN '{}' matched {} keys", pattern, keys.len());
        Ok(keys)
    }

    async fn del(&self, key: &str) -> Result<u64, CacheError> {
        let mut conn = self.conn().await?;
        let deleted: u64 = self.bounded(conn.del(key)).await?;
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let _: String = self
            .bounded(redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(())
    }
}

/// Builds [`RedisConnection`]s from the Redis configuration section.
pub struct RedisConnectionFactory {
    config: RedisConfig,
}

impl RedisConnectionFactory {
    /// Creates a factory for the given configuration.
    #[must_use]
    pub fn new(config: RedisConfig) -> Self {
        Self { config }
    }
}

impl ConnectionFactory for RedisConnectionFactory {
    fn connect(&self, mode: AccessMode) -> Result<Arc<dyn CacheConnection>, CacheError> {
        let url = self.config.endpoint(mode);
        info!(mode = %mode, pool_size = self.config.pool_size, "Creating Redis connection pool");

        let connection = RedisConnection::new(
            url,
            self.config.pool_size,
            self.config.connect_timeout(),
            self.config.command_timeout(),
        )?;
        Ok(Arc::new(connection))
    }
}
