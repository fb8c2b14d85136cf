//! Web UI serving
//!
//! Requests for files (last path segment has an extension) are served from
//! the asset directory. Everything else gets `index.html` so the single-page
//! app can route client-side.

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;

/// Router fallback
pub async fn serve_ui(State(state): State<AppState>, request: Request) -> Response {
    let result = if is_asset_path(request.uri().path()) {
        ServeDir::new(&state.static_assets).oneshot(request).await
    } else {
        ServeFile::new(state.static_assets.join("index.html"))
            .oneshot(request)
            .await
    };

    match result {
        Ok(response) => response.into_response(),
        Err(e) => match e {},
    }
}

fn is_asset_path(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    Path::new(last_segment).extension().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path_detection() {
        assert!(is_asset_path("/main.js"));
        assert!(is_asset_path("/assets/styles.3f2a.css"));
        assert!(!is_asset_path("/"));
        assert!(!is_asset_path("/dashboard"));
        assert!(!is_asset_path("/devices/LaCrosse-TX141W"));
    }
}
