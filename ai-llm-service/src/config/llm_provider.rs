/// Backend used for completion and embedding calls.
///
/// Only the local Ollama runtime is wired today; new backends are added as
/// variants and matched in the service constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
}
