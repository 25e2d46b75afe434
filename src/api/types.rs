//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::api::session::ChatTurn;
use crate::store::StagedDocument;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Application readiness state, driving the UI state machine
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub staged_files: usize,
    pub index_exists: bool,
    /// True when staged files changed after the last process run
    pub index_stale: bool,
    /// Chat input is shown only when ready
    pub ready: bool,
}

/// File listing response
#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<StagedDocument>,
}

/// A file rejected during upload
#[derive(Debug, Serialize)]
pub struct RejectedFile {
    pub name: String,
    pub reason: String,
}

/// Upload result: saved names plus per-file rejections
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded: Vec<String>,
    pub rejected: Vec<RejectedFile>,
}

/// Process (index rebuild) result
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub documents: usize,
    pub chunks: usize,
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first message; the response returns the assigned id
    #[serde(default)]
    pub session_id: Option<String>,
    pub question: String,
}

/// A retrieval source attribution in a chat answer
#[derive(Debug, Serialize)]
pub struct SourceInfo {
    pub doc_name: String,
    pub ordinal: usize,
    pub score: f32,
}

/// Chat answer response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<SourceInfo>,
}

/// Full transcript of a session
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub transcript: Vec<ChatTurn>,
}
