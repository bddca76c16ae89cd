mod cors;
mod database;
mod links;
mod server;

pub use cors::CorsConfig;
pub use database::{DatabaseConfig, StoreBackend};
pub use links::LinkConfig;
pub use server::ServerConfig;

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub links: LinkConfig,
    pub cors: CorsConfig,
}

/// Read `key`, falling back to `default` when unset.
fn env_or<T: FromStr>(key: &str, default: &str) -> AppResult<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port: u16 = env_or("SERVER_PORT", "3000")?;

        let backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()
            .map_err(AppError::Configuration)?;
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if backend == StoreBackend::Memory => String::new(),
            Err(_) => return Err(AppError::MissingEnvVar("DATABASE_URL".to_string())),
        };

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let config = Config {
            server: ServerConfig {
                host: server_host,
                port: server_port,
            },
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections: env_or("DB_MAX_CONNECTIONS", "10")?,
                min_connections: env_or("DB_MIN_CONNECTIONS", "1")?,
                acquire_timeout_seconds: env_or("DB_ACQUIRE_TIMEOUT_SECONDS", "30")?,
            },
            links: LinkConfig {
                base_url,
                short_code_max_attempts: env_or("SHORT_CODE_MAX_ATTEMPTS", "10")?,
                fraud_check_delay_ms: env_or("FRAUD_CHECK_DELAY_MS", "100")?,
            },
            cors: CorsConfig::parse(&allowed_origins),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.database.validate().map_err(AppError::Configuration)?;
        self.links.validate().map_err(AppError::Configuration)?;
        Ok(())
    }
}
