//! Shared fixtures for integration tests

use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use async_trait::async_trait;
use docchat::embeddings::Embedder;
use docchat::Result;

pub const STUB_DIM: usize = 32;

/// Deterministic bag-of-words embedder
///
/// Each word hashes into one of `STUB_DIM` slots, so texts sharing words
/// get higher cosine similarity. Keeps indexing and retrieval testable
/// without a hosted provider.
pub struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; STUB_DIM];
        for word in text.to_lowercase().split_whitespace() {
            let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            v[(hasher.finish() % STUB_DIM as u64) as usize] += 1.0;
        }
        Ok(v)
    }
}
