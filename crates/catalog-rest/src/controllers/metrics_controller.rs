//! Prometheus scrape endpoint.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;

/// Creates a router serving the Prometheus text exposition at `path`.
///
/// Without a recorder handle the route answers with a placeholder.
pub fn router<S>(path: &str, handle: Option<PrometheusHandle>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        path,
        get(move || match handle {
            Some(ref recorder_handle) => std::future::ready(recorder_handle.render()),
            None => std::future::ready("no metrics recorder installed".to_owned()),
        }),
    )
}
