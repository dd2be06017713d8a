pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::document::handlers as document;
use crate::layout::handlers as layout;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Layout core
        .route("/api/v1/layout/resolve", post(layout::handle_resolve))
        .route("/api/v1/layout/preview", post(layout::handle_preview))
        .route("/api/v1/layout/presets", get(layout::handle_presets))
        .route(
            "/api/v1/layout/settings/grid",
            post(layout::handle_grid_update),
        )
        .route(
            "/api/v1/layout/settings/zoom",
            post(layout::handle_zoom),
        )
        // Host shell persistence
        .route("/api/v1/documents/save", post(document::handle_save))
        .route("/api/v1/documents/open", post(document::handle_open))
        .with_state(state)
}
