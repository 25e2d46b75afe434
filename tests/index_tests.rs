//! Indexing pipeline integration tests

mod common;

use std::sync::Arc;

use common::StubEmbedder;
use docchat::errors::DocChatError;
use docchat::index::builder::index_is_stale;
use docchat::index::IndexBuilder;
use docchat::index::TextChunker;
use docchat::index::VectorIndex;
use docchat::store::StagingStore;

fn test_builder() -> IndexBuilder {
    IndexBuilder::new(
        Arc::new(StubEmbedder),
        TextChunker::new(1024, 200),
        "stub-model".to_string(),
        common::STUB_DIM,
    )
}

#[tokio::test]
async fn empty_staging_reports_error_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let staging = StagingStore::new(dir.path().join("temp")).unwrap();
    let index_dir = dir.path().join("storage_mini");

    let err = test_builder().build(&staging, &index_dir).await.unwrap_err();
    assert!(matches!(err, DocChatError::StagingEmpty));
    assert!(!VectorIndex::exists(&index_dir));
}

#[tokio::test]
async fn processing_persists_a_reloadable_index() {
    let dir = tempfile::tempdir().unwrap();
    let staging = StagingStore::new(dir.path().join("temp")).unwrap();
    let index_dir = dir.path().join("storage_mini");

    staging
        .save("geography.txt", b"The capital of France is Paris.")
        .unwrap();
    staging
        .save("astronomy.txt", b"Jupiter is the largest planet in the solar system.")
        .unwrap();

    let index = test_builder().build(&staging, &index_dir).await.unwrap();
    assert_eq!(index.manifest.documents.len(), 2);
    assert!(!index.chunks.is_empty());
    assert!(VectorIndex::exists(&index_dir));

    let loaded = VectorIndex::load(&index_dir).unwrap();
    assert_eq!(loaded.chunks.len(), index.chunks.len());
    assert_eq!(loaded.manifest.embedding_model, "stub-model");
}

#[tokio::test]
async fn retrieval_finds_the_chunk_containing_the_answer() {
    let dir = tempfile::tempdir().unwrap();
    let staging = StagingStore::new(dir.path().join("temp")).unwrap();
    let index_dir = dir.path().join("storage_mini");

    staging
        .save("geography.txt", b"The capital of France is Paris.")
        .unwrap();
    staging
        .save("astronomy.txt", b"Jupiter is the largest planet in the solar system.")
        .unwrap();

    let index = test_builder().build(&staging, &index_dir).await.unwrap();

    let embedder = StubEmbedder;
    let query = docchat::embeddings::Embedder::embed(&embedder, "what is the capital of France")
        .await
        .unwrap();
    let hits = index.top_k(&query, 1);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_name, "geography.txt");
    assert!(hits[0].text.contains("Paris"));
}

#[tokio::test]
async fn rebuild_replaces_the_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let staging = StagingStore::new(dir.path().join("temp")).unwrap();
    let index_dir = dir.path().join("storage_mini");

    staging.save("one.txt", b"first document").unwrap();
    test_builder().build(&staging, &index_dir).await.unwrap();

    staging.delete("one.txt").unwrap();
    staging.save("two.txt", b"second document entirely").unwrap();
    test_builder().build(&staging, &index_dir).await.unwrap();

    let loaded = VectorIndex::load(&index_dir).unwrap();
    assert_eq!(loaded.manifest.documents, vec!["two.txt".to_string()]);
}

#[tokio::test]
async fn staleness_is_flagged_after_staging_drift() {
    let dir = tempfile::tempdir().unwrap();
    let staging = StagingStore::new(dir.path().join("temp")).unwrap();
    let index_dir = dir.path().join("storage_mini");

    staging.save("doc.txt", b"original contents").unwrap();
    test_builder().build(&staging, &index_dir).await.unwrap();
    assert!(!index_is_stale(&staging, &index_dir));

    // Upload without re-processing leaves the index stale
    staging.save("later.txt", b"added after processing").unwrap();
    assert!(index_is_stale(&staging, &index_dir));

    // Re-processing clears the flag
    test_builder().build(&staging, &index_dir).await.unwrap();
    assert!(!index_is_stale(&staging, &index_dir));
}

#[tokio::test]
async fn unsupported_staged_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let staging = StagingStore::new(dir.path().join("temp")).unwrap();
    let index_dir = dir.path().join("storage_mini");

    staging.save("doc.txt", b"real content here").unwrap();
    staging.save("image.png", &[0u8, 1, 2, 3]).unwrap();

    let index = test_builder().build(&staging, &index_dir).await.unwrap();
    assert_eq!(index.manifest.documents, vec!["doc.txt".to_string()]);
}
