//! Prometheus metrics for the product service.

use ::metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::{Duration, Instant};
use tracing::info;

/// Metric names for the product service.
pub mod names {
    /// Service calls, labelled by method and whether the cache answered.
    pub const CACHE_REQUESTS_TOTAL: &str = "catalog_product_cache_requests_total";
    /// Service call latency in seconds, same labels.
    pub const LATENCY_SECONDS: &str = "catalog_product_latency_seconds";
    /// Cache operations absorbed by the fail-open guard.
    pub const CACHE_FAILURES_TOTAL: &str = "catalog_cache_failures_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_REQUESTS_TOTAL,
        "Total product service calls by method and cache hit"
    );
    describe_histogram!(
        names::LATENCY_SECONDS,
        "Product service call latency in seconds"
    );
    describe_counter!(
        names::CACHE_FAILURES_TOTAL,
        "Cache operations that failed open because the cache was unreachable"
    );
}

/// Records one completed service call.
pub fn record_request(method: &'static str, cache_hit: bool, elapsed: Duration) {
    let hit = if cache_hit { "true" } else { "false" };

    counter!(
        names::CACHE_REQUESTS_TOTAL,
        "method" => method,
        "cache_hit" => hit
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "method" => method,
        "cache_hit" => hit
    )
    .record(elapsed.as_secs_f64());

    info!(
        method,
        cache_hit,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Product service call completed"
    );
}

/// Records a cache operation that failed open.
pub fn record_cache_failure(operation: &'static str) {
    counter!(names::CACHE_FAILURES_TOTAL, "operation" => operation).increment(1);
}

/// Times one service call.
#[derive(Debug)]
pub struct RequestTimer {
    method: &'static str,
    started: Instant,
}

impl RequestTimer {
    /// Starts timing `method`.
    #[must_use]
    pub fn start(method: &'static str) -> Self {
        Self {
            method,
            started: Instant::now(),
        }
    }

    /// Stops the timer and records the call.
    pub fn finish(self, cache_hit: bool) {
        record_request(self.method, cache_hit, self.started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        register_metrics();
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("get_product", true, Duration::from_millis(3));
        record_cache_failure("get_cached");
        RequestTimer::start("list_products").finish(false);
    }
}
