//! Unified error type for the recipe-retrieval crate.

use thiserror::Error;

use ai_llm_service::AiLlmError;

/// Errors produced along the retrieval path.
#[derive(Debug, Error)]
pub enum RetrievalError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Request input ────────────────────────────────────────────────────────
    /// Nothing left to search for after normalization.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    // ── Similarity index ─────────────────────────────────────────────────────
    /// Index artifacts could not be loaded or queried.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    // ── Relational store ─────────────────────────────────────────────────────
    /// Store connection or query failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    // ── Embeddings backend ──────────────────────────────────────────────────
    /// Embedding backend failed or returned a vector of the wrong size.
    #[error("embedding error: {0}")]
    Embedding(String),
}

impl From<sqlx::Error> for RetrievalError {
    fn from(e: sqlx::Error) -> Self {
        RetrievalError::StoreUnavailable(e.to_string())
    }
}

impl From<AiLlmError> for RetrievalError {
    fn from(e: AiLlmError) -> Self {
        RetrievalError::Embedding(e.to_string())
    }
}
