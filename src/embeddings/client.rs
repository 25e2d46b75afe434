//! OpenAI-compatible embeddings API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::DocChatError;
use crate::errors::Result;

/// Inputs per embeddings request; providers cap the batch size
const MAX_BATCH_INPUTS: usize = 128;
/// Requests in flight during batch embedding
const BATCH_CONCURRENCY: usize = 4;

/// Client for generating embeddings from a hosted provider
pub struct EmbeddingClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(endpoint: String, model: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| DocChatError::Http(e.to_string()))?;

        Ok(Self {
            endpoint,
            model,
            api_key,
            client,
        })
    }

    async fn request_embeddings(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct EmbeddingRequest<'a> {
            input: &'a [String],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling embeddings API: {} ({} items)", url, input.len());

        let request = EmbeddingRequest {
            input: &input,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DocChatError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocChatError::Embedding(format!(
                "Embeddings API error ({status}): {error_text}"
            )));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| DocChatError::Embedding(format!("Failed to parse response: {e}")))?;

        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request_embeddings(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DocChatError::Embedding("No embedding in response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        use futures::stream::StreamExt;
        use futures::stream::{
            self,
        };

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Split into provider-sized requests, a few in flight at a time
        let batches: Vec<Vec<String>> = texts
            .chunks(MAX_BATCH_INPUTS)
            .map(<[String]>::to_vec)
            .collect();

        let results: Vec<Result<Vec<Vec<f32>>>> = stream::iter(batches)
            .map(|batch| self.request_embeddings(batch))
            .buffered(BATCH_CONCURRENCY)
            .collect()
            .await;

        let mut embeddings = Vec::with_capacity(texts.len());
        for result in results {
            embeddings.extend(result?);
        }

        if embeddings.len() != texts.len() {
            return Err(DocChatError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }
}
