//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality across records.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding provider failed or returned nothing usable.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}

impl From<ai_llm_service::OllamaError> for RagError {
    fn from(err: ai_llm_service::OllamaError) -> Self {
        RagError::Embedding(err.to_string())
    }
}

impl From<ai_llm_service::AiLlmError> for RagError {
    fn from(err: ai_llm_service::AiLlmError) -> Self {
        RagError::Config(err.to_string())
    }
}
