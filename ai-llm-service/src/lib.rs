//! Shared Ollama client for the FAQ chat backend.
//!
//! - [`services::ollama_service::OllamaService`] performs non-streaming
//!   completions and embeddings.
//! - [`completion::CompletionClient`] is the seam the answer pipeline depends on.
//! - [`config::default_config`] builds model configs from the environment.
//! - [`telemetry`] installs the process-wide `tracing` subscriber.

pub mod completion;
pub mod error_handler;
pub mod telemetry;

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
    pub mod llm_provider;
}

pub mod services {
    pub mod ollama_service;
    pub mod response_shape;
}

pub use completion::CompletionClient;
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError};
pub use services::ollama_service::{OllamaError, OllamaService};
