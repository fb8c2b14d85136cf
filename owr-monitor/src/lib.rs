//! owr-monitor library interface
//!
//! Ingests decoder telemetry, derives periodic cooling/window
//! recommendations from a language model, and serves both over HTTP.

pub mod api;
pub mod error;
pub mod ingest;
pub mod recommend;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Directory holding the built web UI
    pub static_assets: PathBuf,
    /// Service startup timestamp
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, static_assets: PathBuf) -> Self {
        Self {
            db,
            static_assets,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// JSON query routes first; anything unmatched falls through to the web UI.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::report_routes())
        .merge(api::device_routes())
        .merge(api::recommendation_routes())
        .merge(api::health_routes())
        .fallback(api::serve_ui)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
