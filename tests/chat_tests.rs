//! Chat flow integration tests against stubbed provider endpoints

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use docchat::api::handlers::chat;
use docchat::api::handlers::get_transcript;
use docchat::api::handlers::process_files;
use docchat::api::handlers::status;
use docchat::api::handlers::AppState;
use docchat::api::session::SessionManager;
use docchat::api::types::ChatRequest;
use docchat::config::AppConfig;
use docchat::embeddings::EmbeddingClient;
use docchat::llm::LlmClient;
use docchat::rag::EngineCell;
use docchat::store::StagingStore;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::Request;
use wiremock::Respond;
use wiremock::ResponseTemplate;

/// Returns one embedding per input item, like the real API
struct EmbeddingsResponder;

impl Respond for EmbeddingsResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let n = body["input"].as_array().map_or(1, Vec::len);
        let data: Vec<serde_json::Value> = (0..n)
            .map(|_| serde_json::json!({ "embedding": [0.1, 0.2, 0.3] }))
            .collect();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data }))
    }
}

async fn mock_provider(answer: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(EmbeddingsResponder)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "content": answer } }]
        })))
        .mount(&server)
        .await;

    server
}

fn test_state(root: &Path, endpoint: &str) -> AppState {
    let mut config = AppConfig::default();
    config.storage.staging_dir = root.join("temp");
    config.storage.index_dir = root.join("storage_mini");
    config.embeddings.endpoint = endpoint.to_string();
    config.embeddings.dimension = 3;
    config.llm.endpoint = endpoint.to_string();

    let staging = StagingStore::new(config.staging_dir()).unwrap();
    let embedder = Arc::new(
        EmbeddingClient::new(
            config.embeddings.endpoint.clone(),
            config.embeddings.model.clone(),
            "test-key".to_string(),
        )
        .unwrap(),
    );
    let llm = LlmClient::new(
        config.llm.endpoint.clone(),
        config.llm.model.clone(),
        "test-key".to_string(),
    )
    .unwrap();
    let engine = Arc::new(EngineCell::new(config.index_dir().to_path_buf()));

    AppState {
        config: Arc::new(config),
        staging,
        embedder,
        llm,
        engine,
        sessions: Arc::new(SessionManager::default()),
    }
}

#[tokio::test]
async fn chat_before_processing_reports_missing_index() {
    let server = mock_provider("unused").await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), &server.uri());

    let response = chat(
        State(state),
        Json(ChatRequest {
            session_id: None,
            question: "anything".to_string(),
        }),
    )
    .await
    .unwrap();

    assert!(!response.0.success);
    assert!(response.0.error.unwrap().contains("No index found"));
}

#[tokio::test]
async fn llm_failure_surfaces_in_the_response_envelope() {
    // Embeddings work, the completion endpoint is down
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(EmbeddingsResponder)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), &server.uri());
    state.staging.save("doc.txt", b"some document text").unwrap();
    let processed = process_files(State(state.clone())).await.unwrap().0;
    assert!(processed.success, "{:?}", processed.error);

    // Same envelope shape as the missing-index case, not a bare status
    let response = chat(
        State(state),
        Json(ChatRequest {
            session_id: None,
            question: "anything".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("upstream unavailable"));
}

#[tokio::test]
async fn status_gates_chat_on_processing() {
    let server = mock_provider("unused").await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), &server.uri());

    // No documents staged
    let s = status(State(state.clone())).await.unwrap().0.data.unwrap();
    assert_eq!(s.staged_files, 0);
    assert!(!s.ready);

    // Staged, not processed
    state.staging.save("doc.txt", b"some document text").unwrap();
    let s = status(State(state.clone())).await.unwrap().0.data.unwrap();
    assert_eq!(s.staged_files, 1);
    assert!(!s.index_exists);
    assert!(!s.ready);

    // Processed: ready to chat
    let processed = process_files(State(state.clone())).await.unwrap().0;
    assert!(processed.success, "{:?}", processed.error);
    let s = status(State(state.clone())).await.unwrap().0.data.unwrap();
    assert!(s.index_exists);
    assert!(!s.index_stale);
    assert!(s.ready);

    // Upload after processing flips the stale flag
    state.staging.save("late.txt", b"uploaded afterwards").unwrap();
    let s = status(State(state)).await.unwrap().0.data.unwrap();
    assert!(s.index_stale);
}

#[tokio::test]
async fn processing_empty_staging_is_a_reported_error() {
    let server = mock_provider("unused").await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), &server.uri());

    let response = process_files(State(state)).await.unwrap().0;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("No files found"));
}

#[tokio::test]
async fn chat_appends_alternating_turns_per_exchange() {
    let server = mock_provider("The capital of France is Paris.").await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), &server.uri());

    state
        .staging
        .save("geography.txt", b"The capital of France is Paris.")
        .unwrap();
    let processed = process_files(State(state.clone())).await.unwrap().0;
    assert!(processed.success, "{:?}", processed.error);

    // First exchange creates the session
    let first = chat(
        State(state.clone()),
        Json(ChatRequest {
            session_id: None,
            question: "What is the capital of France?".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;
    assert!(first.success, "{:?}", first.error);
    let first = first.data.unwrap();
    assert!(first.answer.contains("Paris"));
    assert!(!first.sources.is_empty());

    // Second exchange reuses it
    let second = chat(
        State(state.clone()),
        Json(ChatRequest {
            session_id: Some(first.session_id.clone()),
            question: "Are you sure?".to_string(),
        }),
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();
    assert_eq!(second.session_id, first.session_id);

    // N=2 exchanges -> exactly 2N=4 turns, alternating, in order
    let transcript = get_transcript(
        State(state),
        axum::extract::Path(first.session_id.clone()),
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap()
    .transcript;

    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[0].role, "user");
    assert_eq!(transcript[0].content, "What is the capital of France?");
    assert_eq!(transcript[1].role, "assistant");
    assert_eq!(transcript[2].role, "user");
    assert_eq!(transcript[2].content, "Are you sure?");
    assert_eq!(transcript[3].role, "assistant");
}

#[tokio::test]
async fn rebuild_invalidates_the_cached_engine() {
    let server = mock_provider("ok").await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), &server.uri());

    state.staging.save("doc.txt", b"first version").unwrap();
    let processed = process_files(State(state.clone())).await.unwrap().0;
    assert!(processed.success);

    // First question loads and caches the engine
    let response = chat(
        State(state.clone()),
        Json(ChatRequest {
            session_id: None,
            question: "hello?".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;
    assert!(response.success);
    assert!(state.engine.is_loaded().await);

    // A mid-session rebuild drops the cached engine
    state.staging.save("more.txt", b"second document").unwrap();
    let processed = process_files(State(state.clone())).await.unwrap().0;
    assert!(processed.success);
    assert!(!state.engine.is_loaded().await);
}
