use crate::errors::RagError;
use futures::future::BoxFuture;

/// Asynchronous embedding provider.
///
/// Async is required because real providers (Ollama) perform HTTP requests.
/// Implement this trait to plug in another embedding backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>>;
}

pub mod ollama;
