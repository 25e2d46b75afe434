//! HTTP server implementation

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::api::session::SessionManager;
use crate::api::ui;
use crate::config::AppConfig;
use crate::embeddings::EmbeddingClient;
use crate::llm::LlmClient;
use crate::rag::EngineCell;
use crate::store::StagingStore;
use crate::Result;

/// Upload request body cap (per multipart request)
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the shared application state from configuration
pub fn build_state(config: &AppConfig, api_key: &str) -> Result<AppState> {
    let staging = StagingStore::new(config.staging_dir())?;
    let embedder = Arc::new(EmbeddingClient::new(
        config.embeddings.endpoint.clone(),
        config.embedding_model().to_string(),
        api_key.to_string(),
    )?);
    let llm = LlmClient::new(
        config.llm_endpoint().to_string(),
        config.llm_model().to_string(),
        api_key.to_string(),
    )?;
    let engine = Arc::new(EngineCell::new(config.index_dir().to_path_buf()));
    let sessions = Arc::new(SessionManager::default());

    Ok(AppState {
        config: Arc::new(config.clone()),
        staging,
        embedder,
        llm,
        engine,
        sessions,
    })
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, api_key: &str) -> Result<()> {
    info!("🚀 Starting docchat server...");

    let state = build_state(config, api_key)?;

    // Build routes: JSON API under /api, the chat page at /
    let api_router = routes::api_routes(state);
    let mut app = Router::new()
        .route("/", get(ui::index_page))
        .nest("/api", api_router);

    // Add middleware layers; the body limit must admit document uploads
    app = app
        .layer(axum::extract::DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if config.server.enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{addr}");
    info!("💬 Chat UI available at http://{addr}/");
    info!("");
    info!("Available endpoints:");
    info!("  GET    /api/health            - Health check");
    info!("  GET    /api/status            - Readiness and staleness");
    info!("  GET    /api/files             - List staged files");
    info!("  POST   /api/files             - Upload files (multipart)");
    info!("  DELETE /api/files/:name       - Delete a staged file");
    info!("  POST   /api/process           - Rebuild the index");
    info!("  POST   /api/chat              - Ask a question");
    info!("  GET    /api/chat/:session_id  - Session transcript");

    axum::serve(listener, app).await?;

    Ok(())
}
