//! Device catalog query

use axum::{extract::State, routing::get, Json, Router};
use owr_common::db::{devices, DeviceModelCount};

use crate::{ApiResult, AppState};

/// GET /models
///
/// Every catalogued device with the number of readings stored for it.
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Json<Vec<DeviceModelCount>>> {
    let models = devices::list_with_counts(&state.db).await?;
    Ok(Json(models))
}

pub fn device_routes() -> Router<AppState> {
    Router::new().route("/models", get(list_models))
}
