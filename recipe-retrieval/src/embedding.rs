//! Query embedding on top of the shared [`TextEmbedder`] capability.

use std::sync::Arc;

use ai_llm_service::TextEmbedder;
use tracing::{debug, instrument};

use crate::errors::retrieval_error::RetrievalError;
use crate::normalizer::embedding_text;

/// Turns normalized ingredient tokens into one fixed-length vector.
#[derive(Clone)]
pub struct EmbeddingClient {
    embedder: Arc<dyn TextEmbedder>,
    dim: usize,
}

impl EmbeddingClient {
    pub fn new(embedder: Arc<dyn TextEmbedder>, dim: usize) -> Self {
        Self { embedder, dim }
    }

    /// Expected vector length.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed already-normalized tokens.
    ///
    /// # Errors
    /// - `InputInvalid` if `tokens` is empty
    /// - `Embedding` on backend failure or a dimension mismatch
    #[instrument(target = "recipe_retrieval::embedding", skip_all, fields(tokens = tokens.len()))]
    pub async fn embed_tokens(&self, tokens: &[String]) -> Result<Vec<f32>, RetrievalError> {
        if tokens.is_empty() {
            return Err(RetrievalError::InputInvalid(
                "no ingredients left after normalization".into(),
            ));
        }
        let text = embedding_text(tokens);
        let vector = self.embedder.embed(&text).await?;

        if vector.len() != self.dim {
            return Err(RetrievalError::Embedding(format!(
                "vector length {} != EMBEDDING_DIM {}",
                vector.len(),
                self.dim
            )));
        }
        debug!(target: "recipe_retrieval::embedding", dim = vector.len(), "query embedded");
        Ok(vector)
    }
}
