//! PostgreSQL connection pool.

use async_trait::async_trait;
use catalog_config::DatabaseConfig;
use catalog_core::{CatalogError, CatalogResult, HealthCheck, HealthStatus, Interface};
use shaku::Component;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tracing::{info, warn};

/// Pool operations the repository and the server need.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// The underlying SQLx pool.
    fn inner(&self) -> &PgPool;

    /// Round-trips `SELECT 1`.
    async fn health_check(&self) -> CatalogResult<()>;

    /// Applies the embedded migrations from `migrations/`.
    async fn run_migrations(&self) -> CatalogResult<()>;

    /// Waits for checked-out connections and closes the pool.
    async fn close(&self);
}

/// Shared PostgreSQL pool, injectable as [`DatabasePoolInterface`].
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Opens a pool and waits for its minimum connections.
    pub async fn new(config: &DatabaseConfig) -> CatalogResult<Self> {
        info!(
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!(error = %e, "PostgreSQL connection failed");
                CatalogError::Database(format!("cannot connect: {}", e))
            })?;

        info!("PostgreSQL pool ready");
        Ok(Self { pool })
    }

    /// Wraps a pool opened elsewhere.
    #[must_use]
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &PgPool {
        &self.pool
    }

    async fn health_check(&self) -> CatalogResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| CatalogError::Database(format!("ping failed: {}", e)))
    }

    async fn run_migrations(&self) -> CatalogResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(format!("migration failed: {}", e)))?;
        info!("Catalog schema is up to date");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

/// Readiness check for the database. Failure makes the service unready.
#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match DatabasePoolInterface::health_check(self).await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("connections", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

/// Opens the pool behind an `Arc` so it can be shared with health checks.
pub async fn create_pool(config: &DatabaseConfig) -> CatalogResult<Arc<DatabasePool>> {
    DatabasePool::new(config).await.map(Arc::new)
}
