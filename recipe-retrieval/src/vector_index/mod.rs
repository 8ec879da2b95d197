//! Similarity index capability: `search(vector, k)` over a read-only
//! snapshot loaded once per process.
//!
//! Two implementations exist:
//! - [`faiss_flat::FlatL2Index`]: exact L2 search over a flat index file
//!   and its parallel `.npy` id array;
//! - [`qdrant_index::QdrantIndex`]: a Qdrant collection whose point ids are
//!   recipe ids.

pub mod faiss_flat;
pub mod npy;
pub mod qdrant_index;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::retrieval_error::RetrievalError;

/// One search hit: recipe id and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: i64,
    /// Smaller is closer.
    pub distance: f32,
}

#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Return exactly `k` neighbors ordered by ascending distance.
    ///
    /// Ties keep the index's insertion order. Small indexes repeat ids to
    /// fill `k` slots.
    ///
    /// # Errors
    /// `IndexUnavailable` when the index cannot be queried.
    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError>;

    /// Number of indexed vectors, if known.
    fn len(&self) -> Option<usize> {
        None
    }
}
