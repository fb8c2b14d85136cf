//! Recommendation history queries

use axum::{extract::State, routing::get, Json, Router};
use owr_common::db::{recommendations, Recommendation};

use crate::{ApiError, ApiResult, AppState};

/// Entries returned by `/recommendations`
const HISTORY_LIMIT: i64 = 50;

/// GET /recommendations/latest
pub async fn latest_recommendation(
    State(state): State<AppState>,
) -> ApiResult<Json<Recommendation>> {
    recommendations::latest(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No recommendations stored".to_string()))
}

/// GET /recommendations
///
/// Newest first.
pub async fn recommendation_history(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Recommendation>>> {
    let history = recommendations::recent(&state.db, HISTORY_LIMIT).await?;
    Ok(Json(history))
}

pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(recommendation_history))
        .route("/recommendations/latest", get(latest_recommendation))
}
