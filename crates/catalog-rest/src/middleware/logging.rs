//! Request logging middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Paths whose requests are not logged (metrics scrapes).
#[derive(Debug, Clone, Default)]
pub struct QuietPaths(Arc<[String]>);

impl QuietPaths {
    /// Silences the given paths.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    /// Returns true if requests to `path` are not logged.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|quiet| quiet == path)
    }
}

/// Logs method, URI, status and duration of every request.
pub async fn logging_middleware(
    State(quiet): State<QuietPaths>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if quiet.contains(request.uri().path()) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        target: "http",
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_paths() {
        let quiet = QuietPaths::new(["/metrics"]);
        assert!(quiet.contains("/metrics"));
        assert!(!quiet.contains("/metrics/extra"));
        assert!(!quiet.contains("/api/v1/products"));
        assert!(!QuietPaths::default().contains("/metrics"));
    }
}
