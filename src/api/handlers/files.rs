/// File management handlers: list, upload, delete
use axum::extract::Multipart;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::FileListResponse;
use crate::api::types::RejectedFile;
use crate::api::types::UploadResponse;
use crate::store::is_allowed_type;
use crate::store::ALLOWED_EXTENSIONS;

/// List staged files (GET /api/files)
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FileListResponse>>, StatusCode> {
    match state.staging.list() {
        Ok(files) => Ok(Json(ApiResponse::success(FileListResponse { files }))),
        Err(e) => {
            error!("Failed to list staged files: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Upload one or more files (POST /api/files, multipart)
///
/// The {pdf, txt, doc, docx, csv} allow-list is enforced here, at the UI
/// boundary; the staging store itself accepts anything. Existing names
/// are overwritten silently.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, StatusCode> {
    let mut uploaded = Vec::new();
    let mut rejected = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("Malformed multipart upload: {e}");
                return Err(StatusCode::BAD_REQUEST);
            }
        };

        let Some(name) = field.file_name().map(ToString::to_string) else {
            continue;
        };

        if !is_allowed_type(&name) {
            rejected.push(RejectedFile {
                name,
                reason: format!("Supported formats: {}", ALLOWED_EXTENSIONS.join(", ")),
            });
            continue;
        }

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to read upload body for {name}: {e}");
                rejected.push(RejectedFile {
                    name,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match state.staging.save(&name, &bytes) {
            Ok(_) => {
                info!("Uploaded: {name} ({} bytes)", bytes.len());
                uploaded.push(name);
            }
            Err(e) => {
                error!("Failed to save {name}: {e}");
                rejected.push(RejectedFile {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(Json(ApiResponse::success(UploadResponse {
        uploaded,
        rejected,
    })))
}

/// Delete a staged file (DELETE /api/files/:name)
///
/// Filesystem errors surface to the caller; nothing is rolled back.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match state.staging.delete(&name) {
        Ok(()) => Ok(Json(ApiResponse::success(name))),
        Err(e) => {
            error!("Error deleting file {name}: {e}");
            Ok(Json(ApiResponse::error(format!(
                "Error deleting file: {e}"
            ))))
        }
    }
}
