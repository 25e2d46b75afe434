/// Indexing trigger and readiness handlers
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::ProcessResponse;
use crate::api::types::StatusResponse;
use crate::errors::DocChatError;
use crate::index::builder::index_is_stale;
use crate::index::IndexBuilder;
use crate::index::TextChunker;
use crate::index::VectorIndex;

/// Application readiness (GET /api/status)
///
/// Drives the UI state machine: no documents -> staged but unprocessed ->
/// ready to chat. The chat input is only shown when ready.
pub async fn status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatusResponse>>, StatusCode> {
    let staged_files = match state.staging.list() {
        Ok(files) => files.len(),
        Err(e) => {
            error!("Failed to inspect staging directory: {e}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let index_exists = VectorIndex::exists(state.config.index_dir());
    let index_stale = index_is_stale(&state.staging, state.config.index_dir());

    Ok(Json(ApiResponse::success(StatusResponse {
        staged_files,
        index_exists,
        index_stale,
        ready: index_exists && staged_files > 0,
    })))
}

/// Rebuild the index from the full staging directory (POST /api/process)
///
/// Always a full rebuild; the previous artifact is replaced. An empty
/// staging directory is reported as an error and nothing is written.
pub async fn process_files(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProcessResponse>>, StatusCode> {
    info!("POST /api/process");

    let builder = IndexBuilder::new(
        state.embedder.clone(),
        TextChunker::new(
            state.config.chunking.chunk_size,
            state.config.chunking.chunk_overlap,
        ),
        state.config.embedding_model().to_string(),
        state.config.embedding_dimension(),
    );

    match builder.build(&state.staging, state.config.index_dir()).await {
        Ok(index) => {
            // A cached engine would keep answering from the replaced index
            state.engine.invalidate().await;
            info!("Files processed successfully");
            Ok(Json(ApiResponse::success(ProcessResponse {
                documents: index.manifest.documents.len(),
                chunks: index.chunks.len(),
            })))
        }
        Err(DocChatError::StagingEmpty) => Ok(Json(ApiResponse::error(
            "No files found in the temp folder!",
        ))),
        Err(e) => {
            error!("Index rebuild failed: {e}");
            Ok(Json(ApiResponse::error(format!("Processing failed: {e}"))))
        }
    }
}
