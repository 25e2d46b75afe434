//! Retrieval-augmented query engine over the persisted index

pub mod engine;
pub mod prompts;

pub use engine::EngineCell;
pub use engine::QueryEngine;
pub use engine::QueryOptions;
pub use engine::RagAnswer;
