use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which `LinkStore` implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("Unknown STORE_BACKEND: {}", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Postgres => f.write_str("postgres"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,

    /// PostgreSQL connection URL; unused by the memory backend
    pub url: String,

    /// Maximum number of database connections in the pool
    pub max_connections: u32,

    /// Minimum number of database connections to maintain
    pub min_connections: u32,

    /// Timeout in seconds for acquiring a connection from the pool
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Validate database configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::Postgres && self.url.is_empty() {
            return Err("DATABASE_URL is required for the postgres backend".to_string());
        }

        if self.min_connections > self.max_connections {
            return Err("DB_MIN_CONNECTIONS cannot be greater than DB_MAX_CONNECTIONS".to_string());
        }

        if self.acquire_timeout_seconds == 0 {
            return Err("DB_ACQUIRE_TIMEOUT_SECONDS must be greater than 0".to_string());
        }

        Ok(())
    }
}
