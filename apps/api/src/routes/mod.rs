pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::keywords;
use crate::media;
use crate::state::AppState;
use crate::writer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Writer API
        .route("/api/write", post(writer::handlers::handle_write))
        .route("/api/write/refine", post(writer::handlers::handle_refine))
        .route(
            "/api/write/validate",
            post(writer::handlers::handle_validate),
        )
        .route("/api/write/fix", post(writer::handlers::handle_fix))
        // Keyword API
        .route(
            "/api/keywords/analyze",
            post(keywords::handlers::handle_analyze),
        )
        // Media API
        .route(
            "/api/media/thumbnail",
            post(media::handlers::handle_thumbnail),
        )
        .with_state(state)
}
