//! Lightweight Ollama service for text completion and embeddings.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST .../api/generate`   : single-shot completion (`stream=false`)
//! - `POST .../api/embeddings` : embeddings retrieval
//!
//! It uses the universal configuration [`LlmModelConfig`]. Embedding requests
//! carry only the model and input; sampling options apply to completions.
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::llm_model_config::LlmModelConfig;
//! use ai_llm_service::config::llm_provider::LlmProvider;
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "llama2".into(),
//!     endpoint: "http://localhost:11434/api/generate".into(),
//!     max_tokens: None,
//!     temperature: None,
//!     top_p: None,
//!     timeout_secs: Some(120),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let text = svc.generate("What are your hours?").await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::completion::CompletionClient;
use crate::config::llm_model_config::LlmModelConfig;
use crate::services::response_shape::CompletionShape;

const GENERATE_PATH: &str = "/api/generate";
const EMBEDDINGS_PATH: &str = "/api/embeddings";

/// Errors produced by [`OllamaService`].
///
/// Messages are user-readable: the chat layer shows them verbatim after an
/// `Ollama error:` prefix.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Invalid endpoint (empty or missing http/https).
    #[error("invalid Ollama endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error (connect, timeout, body read).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Result alias for Ollama operations.
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with
/// the configured timeout.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`OllamaError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`OllamaError::Transport`] if HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(OllamaError::InvalidEndpoint(cfg.endpoint));
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let (url_generate, url_embeddings) = ollama_urls(endpoint);

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_embeddings,
        })
    }

    /// Default model identifier for this service.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** generation with the configured model.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_model(prompt, &self.cfg.model).await
    }

    /// Performs a **non-streaming** generation request against `/api/generate`.
    ///
    /// The completion text is extracted through [`CompletionShape`], so
    /// envelopes other than Ollama's own still produce a best-effort answer.
    ///
    /// # Errors
    /// - [`OllamaError::HttpStatus`] for non-2xx responses
    /// - [`OllamaError::Transport`] for client errors and timeouts
    /// - [`OllamaError::Decode`] if the body is not JSON
    #[instrument(skip_all, fields(model = %model))]
    pub async fn generate_with_model(&self, prompt: &str, model: &str) -> Result<String> {
        let body = GenerateRequest::from_cfg(&self.cfg, model, prompt);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp, &self.url_generate).await);
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| OllamaError::Decode(format!("serde error: {e}; ensure `stream=false` is used")))?;

        let shape = CompletionShape::classify(raw);
        debug!(?shape, "completion body classified");
        Ok(shape.into_text())
    }

    /// Retrieves embeddings via `/api/embeddings`.
    ///
    /// Both the legacy `{ embedding: [...] }` and the batched
    /// `{ embeddings: [[...]] }` response forms are accepted.
    ///
    /// # Errors
    /// - [`OllamaError::HttpStatus`] for non-2xx responses
    /// - [`OllamaError::Transport`] for client errors
    /// - [`OllamaError::Decode`] if response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
            input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp, &self.url_embeddings).await);
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            OllamaError::Decode(format!(
                "serde error: {e}; expected `{{ embedding: number[] }}`"
            ))
        })?;

        match out {
            EmbeddingsResponse::Single { embedding } => Ok(embedding),
            EmbeddingsResponse::Batch { embeddings } => embeddings
                .into_iter()
                .next()
                .ok_or_else(|| OllamaError::Decode("empty `embeddings` array".into())),
        }
    }
}

impl CompletionClient for OllamaService {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        model: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let model = model.unwrap_or(self.cfg.model.as_str());
            self.generate_with_model(prompt, model).await
        })
    }
}

/// Derives `(generate_url, embeddings_url)` from any Ollama endpoint.
///
/// Accepts a full `/api/generate` or `/api/embeddings` URL, or a bare host URL.
/// Unknown paths are used as-is for generation.
pub fn ollama_urls(endpoint: &str) -> (String, String) {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if let Some(base) = trimmed.strip_suffix(GENERATE_PATH) {
        return (trimmed.to_string(), format!("{base}{EMBEDDINGS_PATH}"));
    }
    if let Some(base) = trimmed.strip_suffix(EMBEDDINGS_PATH) {
        return (format!("{base}{GENERATE_PATH}"), trimmed.to_string());
    }
    if trimmed.contains("/api/") {
        let base = trimmed.split("/api/").next().unwrap_or(trimmed);
        return (trimmed.to_string(), format!("{base}{EMBEDDINGS_PATH}"));
    }
    (
        format!("{trimmed}{GENERATE_PATH}"),
        format!("{trimmed}{EMBEDDINGS_PATH}"),
    )
}

async fn status_error(resp: reqwest::Response, url: &str) -> OllamaError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let snippet = text.chars().take(240).collect::<String>();
    OllamaError::HttpStatus {
        status,
        url: url.to_string(),
        snippet,
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config, model override and prompt.
    fn from_cfg(cfg: &LlmModelConfig, model: &'a str, prompt: &'a str) -> Self {
        let options = GenerateOptions {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            num_predict: cfg.max_tokens,
        };

        Self {
            model,
            prompt,
            stream: false,
            options: (!options.is_empty()).then_some(options),
        }
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl GenerateOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.num_predict.is_none()
    }
}

/// Request body for `/api/embeddings` (`prompt`) and `/api/embed` (`input`).
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    input: &'a str,
}

/// Response body for the embeddings endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingsResponse {
    Single { embedding: Vec<f32> },
    Batch { embeddings: Vec<Vec<f32>> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama2".into(),
            endpoint: endpoint.into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(120),
        }
    }

    #[test]
    fn urls_from_generate_endpoint() {
        let (g, e) = ollama_urls("http://localhost:11434/api/generate");
        assert_eq!(g, "http://localhost:11434/api/generate");
        assert_eq!(e, "http://localhost:11434/api/embeddings");
    }

    #[test]
    fn urls_from_base_and_embeddings_endpoint() {
        let (g, e) = ollama_urls("http://ollama:11434/");
        assert_eq!(g, "http://ollama:11434/api/generate");
        assert_eq!(e, "http://ollama:11434/api/embeddings");

        let (g, e) = ollama_urls("http://ollama:11434/api/embeddings");
        assert_eq!(g, "http://ollama:11434/api/generate");
        assert_eq!(e, "http://ollama:11434/api/embeddings");
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = OllamaService::new(cfg("localhost:11434")).err();
        assert!(matches!(err, Some(OllamaError::InvalidEndpoint(_))));
    }

    #[test]
    fn generate_request_omits_empty_options() {
        let c = cfg("http://localhost:11434/api/generate");
        let body = serde_json::to_value(GenerateRequest::from_cfg(&c, "mistral", "hi")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "mistral", "prompt": "hi", "stream": false})
        );
    }
}
