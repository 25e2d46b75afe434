//! API route definitions

use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Readiness / UI state machine
        .route("/status", get(handlers::status))
        // File management
        .route("/files", get(handlers::list_files).post(handlers::upload_files))
        .route("/files/:name", delete(handlers::delete_file))
        // Indexing trigger
        .route("/process", post(handlers::process_files))
        // Chat
        .route("/chat", post(handlers::chat))
        .route("/chat/:session_id", get(handlers::get_transcript))
        .with_state(state)
}
