//! Configuration loader with layered sources.

use crate::AppConfig;
use catalog_core::CatalogError;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Prefix of environment variable overrides, e.g. `CATALOG__REDIS__URL`.
pub const ENV_PREFIX: &str = "CATALOG";

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `CATALOG__` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var("CATALOG_ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        Self::with_environment(config_dir, &environment)
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CatalogError> {
        Self::new("./config")
    }

    /// Loads configuration for an explicit environment name.
    pub fn with_environment(
        config_dir: impl Into<PathBuf>,
        environment: &str,
    ) -> Result<Self, CatalogError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir, environment)?;
        Ok(Self { config, config_dir })
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_inner(self) -> AppConfig {
        self.config
    }

    /// Directory the configuration files were read from.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn load_config(config_dir: &Path, environment: &str) -> Result<AppConfig, CatalogError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_catalog_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_catalog_error)?;

        if app_config.app.environment != environment {
            app_config.app.environment = environment.to_string();
        }

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Validates the configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), CatalogError> {
    if config.database.url.is_empty() {
        return Err(CatalogError::Configuration(
            "Database URL is required".to_string(),
        ));
    }
    check_url("database.url", &config.database.url, &["postgres", "postgresql"])?;

    if config.database.min_connections > config.database.max_connections {
        return Err(CatalogError::Configuration(format!(
            "database.min_connections ({}) exceeds database.max_connections ({})",
            config.database.min_connections, config.database.max_connections
        )));
    }

    if config.redis.enabled {
        if config.redis.url.is_empty() {
            return Err(CatalogError::Configuration(
                "Redis URL is required when redis.enabled is true".to_string(),
            ));
        }
        let schemes = ["redis", "rediss"];
        check_url("redis.url", &config.redis.url, &schemes)?;
        for (name, url) in [
            ("redis.read_url", &config.redis.read_url),
            ("redis.write_url", &config.redis.write_url),
        ] {
            if let Some(url) = url.as_deref().filter(|u| !u.is_empty()) {
                check_url(name, url, &schemes)?;
            }
        }
        if config.redis.pool_size == 0 {
            return Err(CatalogError::Configuration(
                "redis.pool_size must be positive".to_string(),
            ));
        }
        if config.redis.command_timeout_ms == 0 || config.redis.connect_timeout_ms == 0 {
            return Err(CatalogError::Configuration(
                "Redis timeouts must be positive".to_string(),
            ));
        }
    } else {
        warn!("Redis caching is disabled; every request goes to the database");
    }

    if config.cache.listing_ttl_secs == 0 {
        return Err(CatalogError::Configuration(
            "cache.listing_ttl_secs must be positive".to_string(),
        ));
    }
    if config.cache.key_prefix.is_empty() || config.cache.key_prefix.contains(':') {
        return Err(CatalogError::Configuration(
            "cache.key_prefix must be non-empty and must not contain ':'".to_string(),
        ));
    }

    Ok(())
}

fn check_url(name: &str, value: &str, schemes: &[&str]) -> Result<(), CatalogError> {
    let url = Url::parse(value)
        .map_err(|e| CatalogError::Configuration(format!("Invalid {name}: {e}")))?;
    if !schemes.contains(&url.scheme()) {
        return Err(CatalogError::Configuration(format!(
            "Invalid {name}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(())
}

fn config_error_to_catalog_error(err: ConfigError) -> CatalogError {
    CatalogError::Configuration(err.to_string())
}
