use std::sync::Arc;

use ai_llm_service::OllamaService;
use ai_llm_service::config::default_config::config_ollama_completion;
use faq_engine::{AnswerResolver, EngineConfig, FaqTable, InMemorySessionStore};
use rag_store::RagStore;
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Answer pipeline (FAQ table, sessions, retriever, completion model).
    pub resolver: Arc<AnswerResolver>,
}

impl AppState {
    pub fn new(resolver: AnswerResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Wires the production pipeline from environment variables.
    ///
    /// A missing FAQ file is not fatal: the table starts empty.
    pub fn from_env() -> Result<Self, AppError> {
        let engine_cfg = EngineConfig::from_env()?;
        let faq = FaqTable::load_or_empty(&engine_cfg.faq_path);

        let completion = OllamaService::new(config_ollama_completion()?)?;
        info!(
            "Completion model '{}', pipeline mode {:?}",
            completion.model(),
            engine_cfg.mode
        );

        let store = RagStore::ollama_from_env()?;
        let sessions = InMemorySessionStore::new(
            engine_cfg.session_ttl,
            engine_cfg.session_max_count,
        );

        Ok(Self::new(AnswerResolver::new(
            &engine_cfg,
            faq,
            Arc::new(completion),
            Arc::new(store),
            Arc::new(sessions),
        )))
    }
}
