//! Completion seam used by the answer pipeline.

use futures::future::BoxFuture;

use crate::services::ollama_service::OllamaError;

/// Single-shot text completion.
///
/// Implementors return the completion text or a typed error; callers decide
/// how an error is rendered. Kept object-safe so it can live behind `Arc<dyn _>`.
pub trait CompletionClient: Send + Sync {
    /// Completes `prompt` with `model`, or with the implementor's default model when `None`.
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        model: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, OllamaError>>;
}
