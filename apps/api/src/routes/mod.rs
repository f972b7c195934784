pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::history::handlers::{handle_delete_analysis, handle_get_analysis, handle_list_history};
use crate::state::AppState;

/// Largest accepted request body (résumé uploads included).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/history", get(handle_list_history))
        .route(
            "/api/history/:id",
            get(handle_get_analysis).delete(handle_delete_analysis),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
