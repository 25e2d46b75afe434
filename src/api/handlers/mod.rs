/// API request handlers
use std::sync::Arc;

use axum::Json;

use crate::api::session::SessionManager;
use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::llm::LlmClient;
use crate::rag::EngineCell;
use crate::store::StagingStore;

// Re-export sub-modules
pub mod chat;
pub mod files;
pub mod process;

// Re-export handlers
pub use chat::*;
pub use files::*;
pub use process::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub staging: StagingStore,
    pub embedder: Arc<dyn Embedder>,
    pub llm: LlmClient,
    pub engine: Arc<EngineCell>,
    pub sessions: Arc<SessionManager>,
}

/// Health check handler
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
