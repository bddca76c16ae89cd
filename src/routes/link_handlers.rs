use crate::error::AppResult;
use crate::models::{CreateLinkRequest, LinkResponse};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use std::sync::Arc;

use super::AppState;

/// Issue a short link; 201 when created, 200 when the URL was already known
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateLinkRequest>,
) -> AppResult<impl IntoResponse> {
    let (link, creation) = state.links.create_link(&payload.target_url).await?;

    let status = if creation.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(LinkResponse::new(link, &state.base_url))))
}

/// Resolve a short code, record the click and redirect
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_url = state.redirects.resolve_and_record(&code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target_url)]))
}
