/// Chat handlers: question answering and transcript retrieval
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::ChatRequest;
use crate::api::types::ChatResponse;
use crate::api::types::SourceInfo;
use crate::api::types::TranscriptResponse;
use crate::rag::QueryOptions;

/// Answer a question within a session (POST /api/chat)
///
/// Appends the user turn, queries the engine (loading it on the first
/// question of the process lifetime), appends the assistant turn. Query
/// failures come back generically in the response envelope, whether the
/// engine failed to load or the answer itself failed.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, StatusCode> {
    info!("POST /api/chat: {}", req.question);

    let mut session = state.sessions.get_or_create(req.session_id.as_deref());
    session.add_turn("user", req.question.clone());

    let options = QueryOptions {
        top_k: state.config.retrieval.top_k,
        temperature: state.config.llm.temperature,
        max_tokens: state.config.llm.max_tokens,
    };

    let engine = match state
        .engine
        .get_or_load(state.embedder.clone(), state.llm.clone(), options)
        .await
    {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to load query engine: {e}");
            state.sessions.update_session(session);
            return Ok(Json(ApiResponse::error(e.to_string())));
        }
    };

    match engine.answer(&req.question).await {
        Ok(result) => {
            session.add_turn("assistant", result.answer.clone());
            let session_id = session.session_id.clone();
            state.sessions.update_session(session);

            let sources = result
                .sources
                .into_iter()
                .map(|s| SourceInfo {
                    doc_name: s.doc_name,
                    ordinal: s.ordinal,
                    score: s.score,
                })
                .collect();

            Ok(Json(ApiResponse::success(ChatResponse {
                session_id,
                answer: result.answer,
                sources,
            })))
        }
        Err(e) => {
            error!("Error processing chat query: {e}");
            state.sessions.update_session(session);
            Ok(Json(ApiResponse::error(e.to_string())))
        }
    }
}

/// Fetch the full transcript of a session (GET /api/chat/:session_id)
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<TranscriptResponse>>, StatusCode> {
    match state.sessions.get_session(&session_id) {
        Some(session) => Ok(Json(ApiResponse::success(TranscriptResponse {
            session_id: session.session_id,
            transcript: session.transcript,
        }))),
        None => Ok(Json(ApiResponse::error("Unknown session"))),
    }
}
