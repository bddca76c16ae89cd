use crate::error::AppResult;
use crate::models::StatsQuery;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json};
use std::sync::Arc;

use super::AppState;

/// Paginated click and earnings analytics for all links
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> AppResult<impl IntoResponse> {
    let stats = state.analytics.get_stats(query.page, query.limit).await?;
    Ok(Json(stats))
}
