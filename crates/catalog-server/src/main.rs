//! # Catalog Server
//!
//! Entry point for the product catalog: a REST API over PostgreSQL with a
//! Redis cache-aside layer in front of product reads.

use catalog_config::ConfigLoader;
use catalog_core::telemetry::init_tracing;
use catalog_core::CatalogResult;
use catalog_server::app::AppBuilder;
use catalog_server::startup::print_banner;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be installed yet if config loading failed.
        eprintln!("Application error: {}", e);
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> CatalogResult<()> {
    let config = ConfigLoader::from_default_location()?.into_inner();

    init_tracing(&config.observability.telemetry())?;
    print_banner();

    info!("Starting {}...", config.app.name);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    AppBuilder::new()
        .with_config(config)
        .run(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
