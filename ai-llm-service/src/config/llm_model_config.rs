use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// # Fields
///
/// - `provider`: which backend to use.
/// - `model`: the model identifier sent with each request (e.g. `"llama2"`).
/// - `endpoint`: full request URL (e.g. `http://localhost:11434/api/generate`).
///   A bare base URL such as `http://localhost:11434` is accepted as well.
/// - `max_tokens`: maximum number of tokens to generate (`num_predict`).
/// - `temperature`: sampling temperature.
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "llama2".to_string(),
///     endpoint: "http://localhost:11434/api/generate".to_string(),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.model, "llama2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint.
    pub endpoint: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
