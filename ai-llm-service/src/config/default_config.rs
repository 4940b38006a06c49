//! Default LLM configs loaded from environment variables.
//!
//! Two Ollama roles are used by the chat backend:
//!
//! - **Completion** → answers and summaries (`/api/generate`, non-streaming)
//! - **Embedding**  → vectors for the FAQ index (`/api/embeddings`)
//!
//! # Environment variables
//!
//! - `OLLAMA_URL`          = completion endpoint (default `http://localhost:11434/api/generate`)
//! - `OLLAMA_MODEL`        = completion model (default `llama2`)
//! - `OLLAMA_TIMEOUT_SECS` = completion timeout (default `120`)
//! - `LLM_MAX_TOKENS`      = optional `num_predict`
//! - `OLLAMA_EMBED_URL`    = embedding endpoint (default derived from `OLLAMA_URL`)
//! - `EMBEDDING_MODEL`     = embedding model (default `nomic-embed-text`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, env_opt, env_opt_u32, env_or, env_parse_or, validate_http_endpoint,
    },
    services::ollama_service::ollama_urls,
};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Local inference is slow; a generous upstream timeout.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 120;

/// Constructs the config for the **completion** model.
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` is not an http(s) URL
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_TIMEOUT_SECS` / `LLM_MAX_TOKENS` are invalid
pub fn config_ollama_completion() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL);
    validate_http_endpoint("OLLAMA_URL", &endpoint)?;

    let model = env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL);
    let timeout = env_parse_or(
        "OLLAMA_TIMEOUT_SECS",
        DEFAULT_COMPLETION_TIMEOUT_SECS,
        "expected u64 seconds",
    )?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        max_tokens,
        temperature: None,
        top_p: None,
        timeout_secs: Some(timeout),
    })
}

/// Constructs the config for the **embedding** model.
///
/// The endpoint is `OLLAMA_EMBED_URL` when set, otherwise the embeddings URL
/// on the same Ollama host as `OLLAMA_URL`.
///
/// # Defaults
/// - `timeout_secs = Some(30)`
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = match env_opt("OLLAMA_EMBED_URL") {
        Some(url) => {
            validate_http_endpoint("OLLAMA_EMBED_URL", &url)?;
            url
        }
        None => {
            let completion = env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL);
            validate_http_endpoint("OLLAMA_URL", &completion)?;
            ollama_urls(&completion).1
        }
    };

    let model = env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_profile_carries_no_sampling_options() {
        let cfg = config_ollama_embedding().unwrap();
        assert_eq!(cfg.max_tokens, None);
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.top_p, None);
        assert_eq!(cfg.timeout_secs, Some(30));
        assert!(cfg.endpoint.ends_with("/api/embeddings") || std::env::var("OLLAMA_EMBED_URL").is_ok());
    }
}
