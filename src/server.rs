//! Server startup and shutdown logic.
//!
//! This module contains the `run_server` function which handles:
//! - Store construction (PostgreSQL or in-memory)
//! - Schema initialisation
//! - Application state and router creation
//! - Server binding and graceful shutdown

use crate::config::{Config, DatabaseConfig, StoreBackend};
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::routes;
use crate::services::SimulatedFraudCheck;
use crate::state::AppState;
use crate::store::{LinkStore, MemoryStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Build the configured store, initialising the schema when `migrate` is set.
pub async fn connect_store(config: &DatabaseConfig, migrate: bool) -> AppResult<Arc<dyn LinkStore>> {
    match config.backend {
        StoreBackend::Postgres => {
            info!("Connecting to database...");
            let repository = Repository::new(
                &config.url,
                config.max_connections,
                config.min_connections,
                config.acquire_timeout_seconds,
            )
            .await?;

            if migrate {
                info!("Running database migrations...");
                repository.run_migrations().await?;
                info!("Migrations completed successfully");
            }

            Ok(Arc::new(repository))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; links and clicks are lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Run the web server with the given configuration.
///
/// # Errors
///
/// This function will return an error if:
/// - Database connection fails
/// - Migration fails
/// - Server binding fails
/// - Server runtime error occurs
pub async fn run_server(config: Config, addr: String, should_migrate: bool) -> AppResult<()> {
    info!("Starting sharelink server...");

    let store = connect_store(&config.database, should_migrate).await?;

    let validator = Arc::new(SimulatedFraudCheck::new(config.links.fraud_check_delay()));
    let state = Arc::new(AppState::new(store, validator, &config.links));

    let app = routes::create_router(state, &config.cors);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);
    info!("Base URL: {}", config.links.base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when Ctrl+C (SIGINT) or, on Unix, SIGTERM is received.
///
/// # Panics
///
/// Panics if a signal handler cannot be installed.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
