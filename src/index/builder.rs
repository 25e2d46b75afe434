//! Full-rebuild indexing pipeline: extract -> chunk -> embed -> persist

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::embeddings::Embedder;
use crate::errors::DocChatError;
use crate::errors::Result;
use crate::index::DocumentChunk;
use crate::index::IndexManifest;
use crate::index::TextChunker;
use crate::index::VectorIndex;
use crate::ingest;
use crate::store::StagingStore;

/// Builds the persisted index from the full staging directory contents
///
/// Every build is a full rebuild: the previous artifact is replaced and
/// nothing is diffed against it. The manifest keeps a fingerprint of the
/// inputs so later drift is detectable.
pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    chunker: TextChunker,
    embedding_model: String,
    embedding_dimension: usize,
}

impl IndexBuilder {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        chunker: TextChunker,
        embedding_model: String,
        embedding_dimension: usize,
    ) -> Self {
        Self {
            embedder,
            chunker,
            embedding_model,
            embedding_dimension,
        }
    }

    /// Rebuild the index from every file in the staging directory
    ///
    /// # Errors
    /// - `StagingEmpty` if there is nothing to index
    /// - Extraction, embedding, and persistence errors propagate
    pub async fn build(&self, staging: &StagingStore, index_dir: &Path) -> Result<VectorIndex> {
        let docs = staging.list()?;
        if docs.is_empty() {
            return Err(DocChatError::StagingEmpty);
        }

        info!("Processing {} staged files into index", docs.len());
        let fingerprint = staging.fingerprint()?;

        // Step 1: extract and chunk every document
        debug!("Step 1: Extracting and chunking documents");
        let mut chunks: Vec<(String, usize, String)> = Vec::new();
        let mut indexed_docs = Vec::new();

        for doc in &docs {
            let path = staging.root().join(&doc.name);
            let text = match ingest::extract_text(&path) {
                Ok(text) => text,
                Err(DocChatError::UnsupportedFileType(ext)) => {
                    warn!("Skipping {} (unsupported type .{ext})", doc.name);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let doc_chunks = self.chunker.chunk(&text);
            debug!("{}: {} chunks", doc.name, doc_chunks.len());
            for (ordinal, text) in doc_chunks.into_iter().enumerate() {
                chunks.push((doc.name.clone(), ordinal, text));
            }
            indexed_docs.push(doc.name.clone());
        }

        if chunks.is_empty() {
            return Err(DocChatError::StagingEmpty);
        }

        // Step 2: embed all chunks in batch
        debug!("Step 2: Embedding {} chunks", chunks.len());
        let texts: Vec<String> = chunks.iter().map(|(_, _, t)| t.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let chunks: Vec<DocumentChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|((doc_name, ordinal, text), embedding)| DocumentChunk {
                doc_name,
                ordinal,
                text,
                embedding,
            })
            .collect();

        // Step 3: persist, replacing the previous artifact
        debug!("Step 3: Persisting index");
        let index = VectorIndex {
            manifest: IndexManifest {
                embedding_model: self.embedding_model.clone(),
                embedding_dimension: self.embedding_dimension,
                chunk_size: self.chunker.chunk_size(),
                chunk_overlap: self.chunker.chunk_overlap(),
                built_at: Utc::now(),
                source_fingerprint: fingerprint,
                documents: indexed_docs,
            },
            chunks,
        };
        index.save(index_dir)?;

        info!("Index rebuild complete");
        Ok(index)
    }
}

/// Whether the persisted index no longer matches the staging contents
///
/// Returns false when either side is missing; staleness only means "an
/// index exists and its inputs have drifted since the last process run".
pub fn index_is_stale(staging: &StagingStore, index_dir: &Path) -> bool {
    let Ok(manifest) = VectorIndex::load_manifest(index_dir) else {
        return false;
    };
    match staging.fingerprint() {
        Ok(current) => current != manifest.source_fingerprint,
        Err(_) => false,
    }
}
