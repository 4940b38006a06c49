//! FAQ vector store over Qdrant.
//!
//! This crate provides:
//! - Ingestion of FAQ lines (as [`IndexedDocument`]s) with Ollama embeddings
//! - Top-1 retrieval ([`VectorRetriever`]) returning a document and its distance
//!
//! The design is flat and splits responsibilities into focused modules.

mod config;
pub mod embed;
mod embed_pool;
mod errors;
mod ingest;
mod qdrant_facade;
mod record;
mod retrieve;

use std::sync::Arc;

pub use config::{DistanceKind, RagConfig, VectorSpace};
pub use embed::EmbeddingsProvider;
pub use errors::RagError;
pub use record::{IndexedDocument, IngestReport, TopMatch};
pub use retrieve::VectorRetriever;

use ai_llm_service::OllamaService;
use ai_llm_service::config::default_config::config_ollama_embedding;
use embed::ollama::{OllamaConfig, OllamaEmbedder};
use futures::future::BoxFuture;
use tracing::{debug, trace};

/// High-level facade that wires configuration, Qdrant client and embedder.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    cfg: RagConfig,
    client: qdrant_facade::QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl RagStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` / `RagError::Qdrant` if the client initialization fails.
    pub fn new(cfg: RagConfig, embedder: Arc<dyn EmbeddingsProvider>) -> Result<Self, RagError> {
        trace!("RagStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self {
            cfg,
            client,
            embedder,
        })
    }

    /// Builds a store from `RagConfig::from_env` with the Ollama embedding
    /// profile (`EMBEDDING_MODEL`, `OLLAMA_EMBED_URL`).
    ///
    /// # Errors
    /// Returns `RagError::Config` for invalid environment values.
    pub fn ollama_from_env() -> Result<Self, RagError> {
        let cfg = RagConfig::from_env()?;
        let svc = OllamaService::new(config_ollama_embedding()?)
            .map_err(|e| RagError::Config(e.to_string()))?;
        let embedder = OllamaEmbedder::new(OllamaConfig {
            svc: Arc::new(svc),
            dim: cfg.embedding_dim,
        });
        Self::new(cfg, Arc::new(embedder))
    }

    /// Embeds and upserts FAQ documents (id = source line number).
    ///
    /// # Errors
    /// Returns embedding errors, vector size mismatches, or Qdrant failures.
    pub async fn ingest(&self, docs: &[IndexedDocument]) -> Result<IngestReport, RagError> {
        debug!("RagStore::ingest documents={}", docs.len());
        ingest::ingest_documents(&self.cfg, &self.client, self.embedder.as_ref(), docs).await
    }
}

/// Anything that can embed and index a batch of FAQ documents.
pub trait DocumentIngester: Send + Sync {
    /// Target collection name, for reporting.
    fn collection(&self) -> &str;

    fn ingest_documents<'a>(
        &'a self,
        docs: &'a [IndexedDocument],
    ) -> BoxFuture<'a, Result<IngestReport, RagError>>;
}

impl DocumentIngester for RagStore {
    fn collection(&self) -> &str {
        &self.cfg.collection
    }

    fn ingest_documents<'a>(
        &'a self,
        docs: &'a [IndexedDocument],
    ) -> BoxFuture<'a, Result<IngestReport, RagError>> {
        Box::pin(self.ingest(docs))
    }
}

impl VectorRetriever for RagStore {
    fn query_top_match<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, Result<Option<TopMatch>, RagError>> {
        Box::pin(async move {
            trace!("RagStore::query_top_match");
            retrieve::top_match(
                &self.client,
                self.embedder.as_ref(),
                text,
                self.cfg.exact_search,
            )
            .await
        })
    }
}
