use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::DocChatError;
use crate::errors::Result;

/// Key required in the `.env` file; startup is fatal without it.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Staging directory for uploaded, not-yet-indexed documents
    pub staging_dir: PathBuf,
    /// Directory holding the persisted index artifact
    pub index_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub endpoint: String,
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default config file path
    ///
    /// Tries config.toml first, then config.example.toml, then falls back
    /// to built-in defaults. Only the `.env` API key is mandatory.
    pub fn load() -> Result<Self> {
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!("Using config.example.toml. Create config.toml to override defaults.");
            Self::from_file("config.example.toml")
        } else {
            Ok(Self::default())
        }
    }

    /// Get staging directory path
    pub fn staging_dir(&self) -> &Path {
        &self.storage.staging_dir
    }

    /// Get index directory path
    pub fn index_dir(&self) -> &Path {
        &self.storage.index_dir
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                enable_cors: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            storage: StorageConfig {
                staging_dir: PathBuf::from("temp"),
                index_dir: PathBuf::from("storage_mini"),
            },
            embeddings: EmbeddingsConfig {
                endpoint: "https://api.groq.com/openai/v1".to_string(),
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
            },
            llm: LlmConfig {
                endpoint: "https://api.groq.com/openai/v1".to_string(),
                model: default_llm_model(),
                temperature: 0.7,
                max_tokens: 2000,
            },
            chunking: ChunkingConfig {
                chunk_size: 1024,
                chunk_overlap: 200,
            },
            retrieval: RetrievalConfig { top_k: 5 },
        }
    }
}

/// Parsed `.env` file contents
#[derive(Debug, Clone)]
pub struct EnvFile {
    entries: HashMap<String, String>,
}

impl EnvFile {
    /// Load and parse a `KEY=VALUE` environment file
    ///
    /// # Errors
    /// - `EnvFileMissing` if the file does not exist
    /// - `Io` if the file cannot be read
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocChatError::EnvFileMissing(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse env file contents: one KEY=VALUE per line, `#` comments,
    /// optional `export ` prefix, optional single/double quoting.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_string();
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                    .unwrap_or(value);
                entries.insert(key, value.to_string());
            }
        }

        Self { entries }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get the required Groq API key
    ///
    /// # Errors
    /// - `ApiKeyMissing` if the key is absent or empty
    pub fn api_key(&self) -> Result<&str> {
        match self.get(API_KEY_VAR) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(DocChatError::ApiKeyMissing),
        }
    }
}

/// Load the API key from `.env` in the application root
///
/// # Errors
/// - `EnvFileMissing` / `ApiKeyMissing` — both fatal at startup
pub fn load_api_key() -> Result<String> {
    let env = EnvFile::load(".env")?;
    Ok(env.api_key()?.to_string())
}
