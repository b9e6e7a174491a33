//! Main application router.

use crate::{
    controllers::{health_controller, metrics_controller, product_controller},
    middleware::{logging_middleware, QuietPaths},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{middleware, routing::get, Router};
use catalog_config::{ObservabilityConfig, ServerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
///
/// `metrics` is the handle of the installed Prometheus recorder; the scrape
/// route is mounted at `observability.metrics_path` when metrics are enabled.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    observability: &ObservabilityConfig,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let api_router = Router::new()
        .nest("/products", product_controller::router())
        .with_state(state.clone());

    let mut router = Router::new()
        // Health endpoints
        .merge(health_controller::router().with_state(state))
        // API v1
        .nest("/api/v1", api_router)
        // Swagger UI and OpenAPI document
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Root endpoint
        .route("/", get(root));

    let mut quiet = Vec::new();
    if observability.metrics_enabled {
        router = router.merge(metrics_controller::router(&observability.metrics_path, metrics));
        quiet.push(observability.metrics_path.clone());
    }

    let router = router
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            QuietPaths::new(quiet),
            logging_middleware,
        ));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Product Catalog API v1"
}
