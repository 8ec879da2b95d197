//! Typed error for the recipe-pipeline crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Normalization, embedding, index or store failures.
    #[error(transparent)]
    Retrieval(#[from] recipe_retrieval::RetrievalError),

    /// Generation or repair failures on the fallback path.
    #[error(transparent)]
    Generation(#[from] recipe_generator::GeneratorError),

    /// Model runtime setup failures at startup.
    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Image lookup client could not be built.
    #[error(transparent)]
    ImageLookup(#[from] services::ImageLookupError),
}
