pub mod export;
pub mod health;
pub mod resume;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Intake
        .route("/api/v1/import", post(resume::handle_import))
        .route("/api/v1/optimize", post(resume::handle_optimize))
        // Layout + export
        .route("/api/v1/preview", post(export::handle_preview))
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        .route("/api/v1/export/word", post(export::handle_export_word))
        // Draft snapshots
        .route(
            "/api/v1/drafts",
            put(resume::handle_save_draft).get(resume::handle_load_draft),
        )
        .with_state(state)
}
