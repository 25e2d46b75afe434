use std::sync::Arc;

use clap::Parser;
use clap::Subcommand;
use docchat::api::serve_api;
use docchat::config;
use docchat::config::AppConfig;
use docchat::embeddings::EmbeddingClient;
use docchat::index::IndexBuilder;
use docchat::index::TextChunker;
use docchat::llm::LlmClient;
use docchat::rag::QueryEngine;
use docchat::rag::QueryOptions;
use docchat::store::StagingStore;
use docchat::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Document question-answering chat over your uploaded files")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI and API server
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Rebuild the index from the staging directory
    Process,
    /// Ask a single question against the persisted index
    Ask {
        /// The question to answer
        question: String,
    },
    /// List files in the staging directory
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load()?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    docchat::logging::init_logging(Some(&config))?;

    // Startup is fatal without the API key; no partial initialization
    let api_key = config::load_api_key()?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve_api(&config, &api_key).await
        }
        Commands::Process => {
            let staging = StagingStore::new(config.staging_dir())?;
            let embedder = Arc::new(EmbeddingClient::new(
                config.embeddings.endpoint.clone(),
                config.embedding_model().to_string(),
                api_key.clone(),
            )?);
            let builder = IndexBuilder::new(
                embedder,
                TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap),
                config.embedding_model().to_string(),
                config.embedding_dimension(),
            );
            let index = builder.build(&staging, config.index_dir()).await?;
            info!(
                "Processed {} documents into {} chunks",
                index.manifest.documents.len(),
                index.chunks.len()
            );
            Ok(())
        }
        Commands::Ask { question } => {
            let embedder = Arc::new(EmbeddingClient::new(
                config.embeddings.endpoint.clone(),
                config.embedding_model().to_string(),
                api_key.clone(),
            )?);
            let llm = LlmClient::new(
                config.llm_endpoint().to_string(),
                config.llm_model().to_string(),
                api_key,
            )?;
            let options = QueryOptions {
                top_k: config.retrieval.top_k,
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            };
            let engine = QueryEngine::load(config.index_dir(), embedder, llm, options)?;
            let result = engine.answer(&question).await?;
            println!("Assistant: {}", result.answer);
            Ok(())
        }
        Commands::List => {
            let staging = StagingStore::new(config.staging_dir())?;
            let docs = staging.list()?;
            if docs.is_empty() {
                println!("No files in the staging folder. Upload some documents first.");
                return Ok(());
            }
            println!("{:<40} {:>12} {:>24}", "Filename", "Size", "Last Modified");
            for doc in docs {
                println!(
                    "{:<40} {:>12} {:>24}",
                    doc.name,
                    doc.human_size,
                    doc.modified.format("%Y-%m-%d %H:%M:%S")
                );
            }
            Ok(())
        }
    }
}
