//! Cache error taxonomy.

use catalog_config::AccessMode;
use catalog_core::CatalogError;
use deadpool_redis::redis::RedisError;
use deadpool_redis::PoolError;
use thiserror::Error;

/// Errors raised by the cache layer.
///
/// The first three variants mean "the cache is down" and are absorbed by
/// [`fail_open`](super::fail_open). Everything else is a defect or a
/// misconfiguration and propagates.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Connection refused, dropped, or failed at the IO level.
    #[error("Cache connection failed: {0}")]
    Connection(String),

    /// Pool checkout, connect, or command exceeded its time bound.
    #[error("Cache operation timed out: {0}")]
    Timeout(String),

    /// Cluster redirect (MOVED/ASK) or cluster-down reply.
    #[error("Cache cluster error: {0}")]
    Cluster(String),

    /// A cached value could not be encoded or decoded.
    #[error("Cache value codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A client was requested before the provider was configured.
    #[error("No cache client configured for {0} mode")]
    NotConfigured(AccessMode),

    /// The endpoint configuration was rejected.
    #[error("Invalid cache configuration: {0}")]
    Config(String),

    /// The server rejected a command.
    #[error("Cache command failed: {0}")]
    Command(String),
}

impl CacheError {
    /// Returns true for the transport failures that mean the cache is down.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::Cluster(_)
        )
    }
}

impl From<RedisError> for CacheError {
    fn from(err: RedisError) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error()
        {
            Self::Connection(err.to_string())
        } else if err.is_cluster_error() {
            Self::Cluster(err.to_string())
        } else {
            Self::Command(err.to_string())
        }
    }
}

impl From<PoolError> for CacheError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Timeout(kind) => Self::Timeout(format!("pool {:?} timeout", kind)),
            PoolError::Backend(e) => Self::from(e),
            other => Self::Connection(other.to_string()),
        }
    }
}

impl From<CacheError> for CatalogError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::NotConfigured(_) | CacheError::Config(_) => {
                Self::Configuration(err.to_string())
            }
            other => Self::Cache(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadpool_redis::redis::ErrorKind;
    use std::io;

    #[test]
    fn test_transport_errors_are_unavailable() {
        assert!(CacheError::Connection("refused".into()).is_unavailable());
        assert!(CacheError::Timeout("slow".into()).is_unavailable());
        assert!(CacheError::Cluster("MOVED".into()).is_unavailable());
        assert!(!CacheError::Command("WRONGTYPE".into()).is_unavailable());
        assert!(!CacheError::NotConfigured(AccessMode::Read).is_unavailable());
    }

    #[test]
    fn test_codec_error_is_not_unavailable() {
        let err: CacheError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_redis_io_error_maps_to_connection() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = CacheError::from(RedisError::from(io_err));
        assert!(matches!(err, CacheError::Connection(_)));
    }

    #[test]
    fn test_redis_timeout_maps_to_timeout() {
        let io_err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        let err = CacheError::from(RedisError::from(io_err));
        assert!(matches!(err, CacheError::Timeout(_)));
    }

    #[test]
    fn test_redis_cluster_errors_map_to_cluster() {
        let moved = RedisError::from((ErrorKind::Moved, "MOVED", "3999 127.0.0.1:6381".to_string()));
        assert!(matches!(CacheError::from(moved), CacheError::Cluster(_)));

        let down = RedisError::from((ErrorKind::ClusterDown, "CLUSTERDOWN"));
        assert!(matches!(CacheError::from(down), CacheError::Cluster(_)));
    }

    #[test]
    fn test_redis_response_error_maps_to_command() {
        let err = RedisError::from((ErrorKind::TypeError, "WRONGTYPE"));
        assert!(matches!(CacheError::from(err), CacheError::Command(_)));
    }

    #[test]
    fn test_conversion_to_catalog_error() {
        let err: CatalogError = CacheError::NotConfigured(AccessMode::Write).into();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");

        let err: CatalogError = CacheError::Command("bad".into()).into();
        assert_eq!(err.error_code(), "CACHE_ERROR");
    }
}
