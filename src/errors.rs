use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocChatError {
    #[error("'.env' file not found at {0}. Create it in the project root with GROQ_API_KEY=your_key")]
    EnvFileMissing(PathBuf),

    #[error("GROQ_API_KEY not found in .env file. Add it as: GROQ_API_KEY=your_key")]
    ApiKeyMissing,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Unsupported file type: .{0}")]
    UnsupportedFileType(String),

    #[error("Text extraction failed for {name}: {reason}")]
    Extraction { name: String, reason: String },

    #[error("No files found in the staging folder")]
    StagingEmpty,

    #[error("No index found at {0}. Run processing before asking questions")]
    IndexMissing(PathBuf),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, DocChatError>;
