//! Typed error for the faq-engine crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid numeric/format values read from the environment.
    #[error("config error: {0}")]
    Config(#[from] ai_llm_service::AiLlmError),

    /// `PIPELINE_MODE` is neither `stateful` nor `stateless`.
    #[error("invalid PIPELINE_MODE '{0}': expected 'stateful' or 'stateless'")]
    InvalidMode(String),

    /// FAQ source file could not be read.
    #[error("cannot read FAQ file {}: {source}", path.display())]
    FaqRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Embedding or vector index failure during ingestion.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),
}
