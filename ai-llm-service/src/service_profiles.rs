//! Shared LLM service with two profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Generation goes through the transport selected in the profile
//!   (HTTP `/api/generate` or the `ollama run` subprocess).
//! - Embeddings always go through HTTP.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::config::default_config::{config_embedding, config_generation};
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//! use ai_llm_service::TextGenerator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmServiceProfiles::new(
//!         config_generation()?,
//!         config_embedding()?,
//!         Some(10),
//!     )?);
//!
//!     let txt = svc.generate("Invent a dish with leeks.").await?;
//!     println!("{txt}");
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::capabilities::{TextEmbedder, TextGenerator};
use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::Result;
use crate::health_service::{HealthService, HealthStatus};
use crate::services::{ollama_cli_service::OllamaCliService, ollama_service::OllamaService};

/// Generation transport resolved from the profile.
enum GenerationBackend {
    Http(OllamaService),
    Cli(OllamaCliService),
}

/// Shared service that manages the **generation** and **embedding** profiles.
pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    embedding: LlmModelConfig,

    generator: GenerationBackend,
    embedder: OllamaService,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates the service and its underlying clients.
    ///
    /// - `generation`: profile used for recipe synthesis (HTTP or CLI).
    /// - `embedding`: profile used for query vectors (HTTP only).
    /// - `health_timeout_secs`: optional timeout for the health checker.
    ///
    /// # Errors
    /// Propagates client construction and provider mismatch errors.
    pub fn new(
        generation: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let generator = match generation.provider {
            LlmProvider::Ollama => GenerationBackend::Http(OllamaService::new(generation.clone())?),
            LlmProvider::OllamaCli => {
                GenerationBackend::Cli(OllamaCliService::new(generation.clone())?)
            }
        };
        let embedder = OllamaService::new(embedding.clone())?;

        info!(
            generation_model = %generation.model,
            generation_transport = ?generation.provider,
            embedding_model = %embedding.model,
            "LLM profiles initialized"
        );

        Ok(Self {
            generation,
            embedding,
            generator,
            embedder,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Returns a health snapshot for both profiles.
    ///
    /// If both profiles point at the same model, it is checked once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = vec![self.generation.clone()];
        if self.embedding.model != self.generation.model {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }
}

#[async_trait]
impl TextGenerator for LlmServiceProfiles {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match &self.generator {
            GenerationBackend::Http(svc) => svc.generate(prompt).await,
            GenerationBackend::Cli(cli) => cli.generate(prompt).await,
        }
    }
}

#[async_trait]
impl TextEmbedder for LlmServiceProfiles {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder.embeddings(text).await
    }
}
