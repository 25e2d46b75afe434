//! Embedded single-page chat UI
//!
//! Presentation only: upload control, file table with per-row delete, a
//! process button, and a chat panel that stays hidden until the status
//! endpoint reports ready.

use axum::response::Html;

/// Serve the chat page (GET /)
pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
