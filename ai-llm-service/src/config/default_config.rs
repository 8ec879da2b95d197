//! Default model configs loaded from environment variables.
//!
//! Two roles are needed by the recipe finder:
//!
//! - **Generation** → recipe synthesis when retrieval finds nothing relevant
//! - **Embedding**  → query vectors for the similarity index
//!
//! # Environment variables
//!
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)
//! - `GENERATION_MODEL`          = generation model tag (default `gemma3:1b`)
//! - `GENERATION_TRANSPORT`      = `cli` (default) or `http`
//! - `OLLAMA_BIN`                = CLI executable (default `ollama`)
//! - `GENERATION_TIMEOUT_SECS`   = per-attempt timeout (default 120)
//! - `LLM_MAX_TOKENS`            = optional max tokens (u32)
//! - `EMBEDDING_MODEL`           = embedding model (default `all-minilm`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_opt_u64, env_or, validate_http_endpoint,
    },
};

/// Default generation model tag.
pub const DEFAULT_GENERATION_MODEL: &str = "gemma3:1b";
/// Default embedding model tag.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
/// Default per-attempt generation timeout.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` has no http(s) scheme
pub fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", url.trim())?;
            return Ok(url.trim().to_string());
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Ok("http://localhost:11434".to_string())
}

/// Constructs the config for the **generation** model.
///
/// # Defaults
/// - transport `cli`, model `gemma3:1b`, timeout 120 s
/// - `temperature = Some(0.7)` for the HTTP transport
///
/// # Errors
/// Invalid numbers, unknown transport names or malformed endpoints.
pub fn config_generation() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let transport = env_or("GENERATION_TRANSPORT", "cli");
    let provider = LlmProvider::from_transport(&transport)
        .ok_or(ConfigError::UnsupportedTransport(transport))?;
    let model = env_or("GENERATION_MODEL", DEFAULT_GENERATION_MODEL);
    let timeout_secs =
        env_opt_u64("GENERATION_TIMEOUT_SECS")?.unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS);
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        program: env_or("OLLAMA_BIN", "ollama"),
        max_tokens,
        temperature: Some(0.7),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Constructs the config for the **embedding** model.
///
/// Embeddings always go through the HTTP API.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        program: env_or("OLLAMA_BIN", "ollama"),
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}
