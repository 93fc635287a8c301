pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/kinds", get(handlers::handle_list_kinds))
        .route("/api/v1/generate/:kind", post(handlers::handle_generate))
        .route(
            "/api/v1/resume/analyze",
            post(handlers::handle_analyze_resume),
        )
        .route(
            "/api/v1/resume/match-score",
            post(handlers::handle_match_score),
        )
        .route(
            "/api/v1/resume/generate",
            post(handlers::handle_best_ats_resume),
        )
        .route("/api/v1/cover-letter", post(handlers::handle_cover_letter))
        .route("/api/v1/opportunities", post(handlers::handle_opportunities))
        .route("/api/v1/chat", post(handlers::handle_chat))
        .layer(upload_limit)
        .with_state(state)
}
