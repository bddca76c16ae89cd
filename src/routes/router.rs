use crate::config::CorsConfig;
use crate::middleware::{request_context_middleware, request_id_middleware};
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::link_handlers;
use super::stats_handlers;
use super::AppState;

/// Upper bound on request bodies; a link request is a single URL
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Create application router
pub fn create_router(state: Arc<AppState>, cors_config: &CorsConfig) -> axum::Router {
    let cors = if cors_config.allows_any() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|s| s.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Static paths take priority over the /{short_code} capture
    axum::Router::new()
        .route("/links", post(link_handlers::create_link))
        .route("/stats", get(stats_handlers::get_stats))
        .route("/_health", get(health::health_check))
        .route("/{short_code}", get(link_handlers::redirect))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(middleware::from_fn(request_context_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
