//! Weather report queries

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use owr_common::db::{readings, StoredReading};

use crate::{ApiError, ApiResult, AppState};

/// How far back `/reports/:model` looks
const REPORT_HISTORY_DAYS: i64 = 5;

/// GET /reports/latest
///
/// Most recent reading from any device.
pub async fn latest_report(State(state): State<AppState>) -> ApiResult<Json<StoredReading>> {
    readings::latest(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No weather reports stored".to_string()))
}

/// GET /reports/:model
///
/// Readings for one device over the last five days, oldest first.
pub async fn reports_for_model(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> ApiResult<Json<Vec<StoredReading>>> {
    let since = Utc::now() - Duration::days(REPORT_HISTORY_DAYS);
    let reports = readings::for_device_since(&state.db, &model, since).await?;
    Ok(Json(reports))
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/latest", get(latest_report))
        .route("/reports/:model", get(reports_for_model))
}
