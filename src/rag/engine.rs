//! Query engine: load persisted index, retrieve, generate

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::index::ScoredChunk;
use crate::index::VectorIndex;
use crate::llm::LlmClient;
use crate::rag::prompts;

/// Retrieval and generation parameters for a query
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub top_k: usize,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Answer to a question, with the retrieved chunks that backed it
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub question: String,
    pub answer: String,
    pub sources: Vec<ScoredChunk>,
}

/// Answers questions against the persisted index
///
/// Holds the loaded index for its lifetime; construction fails with
/// `IndexMissing` when processing was never run.
pub struct QueryEngine {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
    llm: LlmClient,
    options: QueryOptions,
}

impl QueryEngine {
    /// Load the persisted index and wire up the provider clients
    ///
    /// # Errors
    /// - `IndexMissing` if no index has been persisted yet
    /// - `Serialization` if the artifact cannot be parsed
    pub fn load(
        index_dir: &Path,
        embedder: Arc<dyn Embedder>,
        llm: LlmClient,
        options: QueryOptions,
    ) -> Result<Self> {
        let index = VectorIndex::load(index_dir)?;
        info!(
            "Loaded index: {} chunks from {} documents",
            index.chunks.len(),
            index.manifest.documents.len()
        );
        Ok(Self {
            index,
            embedder,
            llm,
            options,
        })
    }

    /// Documents the loaded index was built from
    pub fn documents(&self) -> &[String] {
        &self.index.manifest.documents
    }

    /// Answer a free-text question
    ///
    /// # Errors
    /// Embedding, retrieval, and LLM failures propagate generically; the
    /// caller surfaces them without categorization.
    pub async fn answer(&self, question: &str) -> Result<RagAnswer> {
        info!("Processing query: {question}");

        debug!("Step 1: Embedding question");
        let query_embedding = self.embedder.embed(question).await?;

        debug!("Step 2: Retrieving top-{} chunks", self.options.top_k);
        let hits = self.index.top_k(&query_embedding, self.options.top_k);
        debug!("Retrieved {} chunks", hits.len());

        debug!("Step 3: Generating answer");
        let context = prompts::assemble_context(&hits);
        let prompt = prompts::build_prompt(question, &context);
        let answer = self
            .llm
            .generate_with_params(&prompt, self.options.temperature, self.options.max_tokens)
            .await?;

        info!("Query completed");
        Ok(RagAnswer {
            question: question.to_string(),
            answer,
            sources: hits,
        })
    }
}

/// Lazily constructed, session-cached query engine handle
///
/// The engine is built from the persisted index on first query and reused
/// afterwards; `invalidate` drops the cached engine so a rebuild mid-run
/// takes effect on the next question.
pub struct EngineCell {
    index_dir: PathBuf,
    inner: RwLock<Option<Arc<QueryEngine>>>,
}

impl EngineCell {
    pub fn new(index_dir: PathBuf) -> Self {
        Self {
            index_dir,
            inner: RwLock::new(None),
        }
    }

    /// Whether an engine is currently cached
    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Get the cached engine, constructing it on first use
    pub async fn get_or_load(
        &self,
        embedder: Arc<dyn Embedder>,
        llm: LlmClient,
        options: QueryOptions,
    ) -> Result<Arc<QueryEngine>> {
        if let Some(engine) = self.inner.read().await.as_ref() {
            return Ok(engine.clone());
        }

        let mut slot = self.inner.write().await;
        // A concurrent caller may have loaded while we waited on the lock
        if let Some(engine) = slot.as_ref() {
            return Ok(engine.clone());
        }

        let engine = Arc::new(QueryEngine::load(&self.index_dir, embedder, llm, options)?);
        *slot = Some(engine.clone());
        Ok(engine)
    }

    /// Drop the cached engine; the next query reloads from disk
    pub async fn invalidate(&self) {
        let mut slot = self.inner.write().await;
        if slot.take().is_some() {
            info!("Query engine invalidated; next query reloads the index");
        }
    }
}
