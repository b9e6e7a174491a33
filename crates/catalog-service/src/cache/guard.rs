//! Fail-open guard for cache operations.

use super::CacheError;
use crate::metrics;
use std::future::Future;
use tracing::warn;

/// Runs a cache operation, substituting `default` if the cache is down.
///
/// Only transport failures (see [`CacheError::is_unavailable`]) are
/// absorbed; they are logged at `warn` with the operation name and counted.
/// Any other error is returned unchanged.
pub async fn fail_open<T, F>(operation: &'static str, default: T, op: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, CacheError>>,
{
    match op.await {
        Ok(value) => Ok(value),
        Err(e) if e.is_unavailable() => {
            warn!(operation, error = %e, "Cache unavailable, continuing without it");
            metrics::record_cache_failure(operation);
            Ok(default)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_passes_through() {
        let result = fail_open("get", None, async { Ok(Some(7)) }).await;
        assert_eq!(result.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_transport_failure_yields_default() {
        let result = fail_open("set", false, async {
            Err(CacheError::Connection("refused".into()))
        })
        .await;
        assert!(!result.unwrap());

        let result = fail_open("invalidate", 0_u64, async {
            Err(CacheError::Timeout("500ms".into()))
        })
        .await;
        assert_eq!(result.unwrap(), 0);

        let result = fail_open("get", None::<String>, async {
            Err(CacheError::Cluster("MOVED".into()))
        })
        .await;
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let result = fail_open("get", None::<String>, async {
            Err(CacheError::Command("WRONGTYPE".into()))
        })
        .await;
        assert!(matches!(result, Err(CacheError::Command(_))));
    }
}
