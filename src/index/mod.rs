//! Persisted vector index over document chunks
//!
//! The index is a flat, serde-persisted chunk list with cosine-similarity
//! retrieval. It is rebuilt wholesale from the staging directory on every
//! process action; the manifest records a fingerprint of the inputs so a
//! stale index can at least be detected.

pub mod builder;
pub mod chunker;

pub use builder::IndexBuilder;
pub use chunker::TextChunker;

use std::path::Path;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::errors::DocChatError;
use crate::errors::Result;

pub const INDEX_FILE: &str = "index.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// One embedded chunk of a staged document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub doc_name: String,
    pub ordinal: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Metadata describing how and from what the index was built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub built_at: DateTime<Utc>,
    /// Fingerprint of the staging listing at build time; compared against
    /// the live staging fingerprint to flag staleness
    pub source_fingerprint: String,
    pub documents: Vec<String>,
}

/// A retrieval hit with its similarity score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub doc_name: String,
    pub ordinal: usize,
    pub text: String,
    pub score: f32,
}

/// The persisted vector index: manifest plus embedded chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    pub manifest: IndexManifest,
    pub chunks: Vec<DocumentChunk>,
}

impl VectorIndex {
    /// Whether a persisted index exists at the given location
    pub fn exists(dir: &Path) -> bool {
        dir.join(INDEX_FILE).exists() && dir.join(MANIFEST_FILE).exists()
    }

    /// Persist the index, replacing any previous artifact
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let manifest_json = serde_json::to_string_pretty(&self.manifest)?;
        std::fs::write(dir.join(MANIFEST_FILE), manifest_json)?;

        let index_json = serde_json::to_string(&self.chunks)?;
        std::fs::write(dir.join(INDEX_FILE), index_json)?;

        info!(
            "Persisted index: {} chunks from {} documents at {}",
            self.chunks.len(),
            self.manifest.documents.len(),
            dir.display()
        );
        Ok(())
    }

    /// Load a persisted index
    ///
    /// # Errors
    /// - `IndexMissing` if processing was never run
    /// - `Serialization` if the artifact cannot be parsed
    pub fn load(dir: &Path) -> Result<Self> {
        if !Self::exists(dir) {
            return Err(DocChatError::IndexMissing(dir.to_path_buf()));
        }

        let manifest_json = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        let manifest: IndexManifest = serde_json::from_str(&manifest_json)?;

        let index_json = std::fs::read_to_string(dir.join(INDEX_FILE))?;
        let chunks: Vec<DocumentChunk> = serde_json::from_str(&index_json)?;

        Ok(Self { manifest, chunks })
    }

    /// Load only the manifest (for staleness checks)
    pub fn load_manifest(dir: &Path) -> Result<IndexManifest> {
        if !Self::exists(dir) {
            return Err(DocChatError::IndexMissing(dir.to_path_buf()));
        }
        let manifest_json = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        Ok(serde_json::from_str(&manifest_json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Rank chunks by cosine similarity against a query embedding
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                doc_name: chunk.doc_name.clone(),
                ordinal: chunk.ordinal,
                text: chunk.text.clone(),
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity between two vectors; zero for mismatched or zero-norm inputs
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
