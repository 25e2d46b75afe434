//! Embedding generation over hosted HTTP endpoints

pub mod client;

pub use client::EmbeddingClient;

use async_trait::async_trait;

use crate::errors::Result;

/// Seam for embedding generation
///
/// The production implementation is [`EmbeddingClient`]; tests substitute
/// a deterministic embedder so indexing and retrieval stay exercisable
/// without a hosted provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}
