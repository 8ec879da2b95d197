//! Ollama CLI transport: runs `ollama run <model> <prompt>` as a child process.
//!
//! The child's stdout is the generated text. Output is decoded as UTF-8 with
//! lossy replacement so a stray byte never aborts a generation. The child is
//! killed when the call is dropped (e.g. by an outer timeout).

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, ConfigError, Result, make_snippet};

/// Generation through the `ollama` executable.
pub struct OllamaCliService {
    cfg: LlmModelConfig,
    timeout: Duration,
}

impl OllamaCliService {
    /// Creates a CLI-backed generator.
    ///
    /// # Errors
    /// - [`AiLlmError::InvalidProvider`] if `cfg.provider` is not `OllamaCli`
    /// - [`ConfigError::EmptyModel`] if no model tag is set
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::OllamaCli {
            return Err(AiLlmError::InvalidProvider {
                expected: "OllamaCli",
            });
        }
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(120));
        Ok(Self { cfg, timeout })
    }

    /// Runs one generation and returns the decoded stdout.
    ///
    /// # Errors
    /// - [`AiLlmError::Spawn`] if the executable cannot be started
    /// - [`AiLlmError::Timeout`] if the process outlives the configured timeout
    /// - [`AiLlmError::ProcessExit`] on a non-zero exit status
    #[instrument(skip_all, fields(model = %self.cfg.model, program = %self.cfg.program))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("{} run {}", self.cfg.program, self.cfg.model);

        let child = Command::new(&self.cfg.program)
            .arg("run")
            .arg(&self.cfg.model)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AiLlmError::Spawn {
                program: self.cfg.program.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(res) => res.map_err(|source| AiLlmError::Spawn {
                program: self.cfg.program.clone(),
                source,
            })?,
            Err(_) => return Err(AiLlmError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            let stderr = make_snippet(&String::from_utf8_lossy(&output.stderr));
            warn!(
                code = ?output.status.code(),
                stderr = %stderr,
                "ollama process exited unsuccessfully"
            );
            return Err(AiLlmError::ProcessExit {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn cfg(program: &str, timeout_secs: u64) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OllamaCli,
            model: "gemma3:1b".into(),
            endpoint: "http://localhost:11434".into(),
            program: program.into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(timeout_secs),
        }
    }

    #[tokio::test]
    async fn captures_stdout() {
        // `echo run <model> <prompt>` stands in for the real binary.
        let svc = OllamaCliService::new(cfg("echo", 5)).unwrap();
        let out = svc.generate("{\"k\": 1}").await.unwrap();
        assert_eq!(out.trim(), "run gemma3:1b {\"k\": 1}");
    }

    #[tokio::test]
    async fn non_zero_exit_is_transient() {
        let svc = OllamaCliService::new(cfg("false", 5)).unwrap();
        let err = svc.generate("x").await.unwrap_err();
        assert!(matches!(err, AiLlmError::ProcessExit { code: Some(1), .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn missing_binary_is_fatal() {
        let svc = OllamaCliService::new(cfg("/nonexistent/ollama-binary", 5)).unwrap();
        let err = svc.generate("x").await.unwrap_err();
        assert!(matches!(err, AiLlmError::Spawn { .. }));
        assert!(!err.is_transient());
    }
}
