//! Retrieval half of the recipe finder.
//!
//! Public API:
//! - [`normalizer::normalize`]: ingredient token normalization.
//! - [`embedding::EmbeddingClient`]: query vector on top of a `TextEmbedder`.
//! - [`vector_index::SimilarityIndex`]: ordered `(id, distance)` neighbors,
//!   built from config by [`open_index`].
//! - [`store::RecipeStore`]: candidate rows and image write-back.
//! - [`ranking::rank`]: substring scoring plus the fallback decision.

pub mod embedding;
pub mod errors;
pub mod normalizer;
pub mod ranking;
pub mod store;
pub mod structs;
pub mod vector_index;

use std::sync::Arc;

use tracing::info;

pub use errors::retrieval_error::RetrievalError;
pub use structs::ranked_candidate::{RankedCandidate, Ranking};
pub use structs::retrieval_config::{IndexBackend, RetrievalConfig};
pub use structs::stored_recipe::StoredRecipe;

use vector_index::SimilarityIndex;
use vector_index::faiss_flat::FlatL2Index;
use vector_index::qdrant_index::QdrantIndex;

/// Load or connect the configured similarity index.
///
/// Flat artifacts are read fully into memory here, once per process.
pub fn open_index(backend: &IndexBackend) -> Result<Arc<dyn SimilarityIndex>, RetrievalError> {
    info!(target: "recipe_retrieval::index", ?backend, "opening similarity index");
    let index: Arc<dyn SimilarityIndex> = match backend {
        IndexBackend::Faiss { dir } => Arc::new(FlatL2Index::load(dir)?),
        IndexBackend::Qdrant { url, collection } => Arc::new(QdrantIndex::connect(url, collection)?),
    };
    Ok(index)
}
