use crate::config::llm_provider::LlmProvider;

/// Configuration for one model invocation profile.
///
/// # Fields
///
/// - `provider`: how the runtime is reached (HTTP or CLI subprocess).
/// - `model`: Ollama model tag (e.g., `"gemma3:1b"`, `"all-minilm"`).
/// - `endpoint`: base URL of the Ollama HTTP API.
/// - `program`: executable used by the CLI transport.
/// - `max_tokens`: maximum number of tokens to generate (HTTP only).
/// - `temperature`: sampling temperature (HTTP only).
/// - `top_p`: nucleus sampling cutoff (HTTP only).
/// - `timeout_secs`: hard timeout for a single call.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OllamaCli,
///     model: "gemma3:1b".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     program: "ollama".to_string(),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.provider, LlmProvider::OllamaCli);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The transport to the Ollama runtime.
    pub provider: LlmProvider,

    /// Model tag string (e.g., `"gemma3:1b"`).
    pub model: String,

    /// Ollama HTTP base URL.
    pub endpoint: String,

    /// CLI executable (`ollama` by default).
    pub program: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional per-call timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
