pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::intake::handlers as intake;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

/// Photos travel inline as data URIs, and PDFs as uploads; both exceed axum's 2 MB default.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/generate", post(generation::handle_generate))
        .route(
            "/api/v1/profiles/:user_id",
            get(profiles::handle_get_profile).put(profiles::handle_save_profile),
        )
        .route("/api/v1/export/text", post(export::handle_export_text))
        .route("/api/v1/intake/pdf", post(intake::handle_extract_pdf))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
