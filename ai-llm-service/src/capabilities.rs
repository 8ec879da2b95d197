//! Object-safe seams over the model runtime.
//!
//! Callers hold `Arc<dyn TextGenerator>` / `Arc<dyn TextEmbedder>` so that
//! tests can swap the runtime for scripted doubles.

use async_trait::async_trait;

use crate::error_handler::Result;

/// Prompt in, raw text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Runs one generation. No retries happen at this level.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Text in, dense vector out.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Encodes `text` into a vector. Deterministic for identical input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
