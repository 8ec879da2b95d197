/// Transport used to reach the local Ollama runtime.
///
/// Both variants talk to the same models; they differ only in how a prompt
/// travels to the runtime and how failures surface.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// fn describe(provider: LlmProvider) -> &'static str {
///     match provider {
///         LlmProvider::Ollama => "HTTP /api/generate",
///         LlmProvider::OllamaCli => "ollama run subprocess",
///     }
/// }
/// assert_eq!(describe(LlmProvider::OllamaCli), "ollama run subprocess");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Ollama HTTP API (`/api/generate`, `/api/embeddings`).
    Ollama,
    /// `ollama run <model> <prompt>` as a child process; stdout is the answer.
    OllamaCli,
}

impl LlmProvider {
    /// Parses `GENERATION_TRANSPORT` values (case-insensitive).
    pub fn from_transport(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" | "api" | "ollama" => Some(LlmProvider::Ollama),
            "cli" | "process" | "subprocess" => Some(LlmProvider::OllamaCli),
            _ => None,
        }
    }
}
