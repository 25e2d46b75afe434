//! Hosted LLM chat-completions client (Groq, OpenAI-compatible)

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::DocChatError;
use crate::errors::Result;

/// A single message in a chat-completions request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Client for the hosted chat-completions endpoint
#[derive(Clone)]
pub struct LlmClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

impl LlmClient {
    /// Create a new LLM client
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

    /// Model name this client generates with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a completion for a prompt with default parameters
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_params(prompt, 0.7, 2000).await
    }

    /// Generate a completion with explicit temperature and token budget
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication)
    /// - Provider errors (rate limits, invalid model) surfaced as `Llm`
    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        let messages = vec![ChatMessage::user(prompt)];
        self.chat(&messages, temperature, max_tokens).await
    }

    /// Send a chat-completions request
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} (model: {})", url, self.model);

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
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
            return Err(DocChatError::Llm(format!(
                "Chat completions API error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| DocChatError::Llm(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DocChatError::Llm("No choices in response".to_string()))
    }
}
