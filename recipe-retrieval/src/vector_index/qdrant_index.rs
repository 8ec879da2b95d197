//! Qdrant-backed similarity index.
//!
//! The collection holds one point per recipe with the numeric recipe id as
//! point id and uses `Euclid` distance, so a hit's score is its L2 distance
//! and Qdrant already returns hits closest first. Searches are exact, like
//! the flat index.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{ScoredPoint, SearchParamsBuilder, SearchPointsBuilder};
use tracing::{debug, info, instrument, warn};

use super::{Neighbor, SimilarityIndex};
use crate::errors::retrieval_error::RetrievalError;

pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantIndex {
    /// Establish a gRPC client for `url` (e.g. `http://localhost:6334`).
    ///
    /// This call does not touch the collection.
    pub fn connect(url: &str, collection: &str) -> Result<Self, RetrievalError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| RetrievalError::IndexUnavailable(format!("qdrant client build: {e}")))?;
        info!(target: "recipe_retrieval::index", url, collection, "qdrant index configured");
        Ok(Self {
            client,
            collection: collection.to_string(),
        })
    }
}

#[async_trait]
impl SimilarityIndex for QdrantIndex {
    #[instrument(target = "recipe_retrieval::index", skip_all, fields(k = k, collection = %self.collection))]
    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
        let builder = SearchPointsBuilder::new(&self.collection, vector.to_vec(), k as u64)
            .with_payload(false)
            .with_vectors(false)
            .params(SearchParamsBuilder::default().exact(true));

        let resp = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RetrievalError::IndexUnavailable(format!("search_points: {e}")))?;

        let hits: Vec<Neighbor> = resp.result.into_iter().filter_map(to_neighbor).collect();
        debug!(target: "recipe_retrieval::index", returned = hits.len(), "qdrant search done");
        pad_to_k(hits, k)
    }
}

/// Map a scored point with a numeric id; UUID ids are not recipe ids.
fn to_neighbor(sp: ScoredPoint) -> Option<Neighbor> {
    match sp.id.and_then(|p| p.point_id_options) {
        Some(PointIdOptions::Num(n)) => Some(Neighbor {
            id: n as i64,
            distance: sp.score,
        }),
        other => {
            warn!(target: "recipe_retrieval::index", id = ?other, "skipping non-numeric point id");
            None
        }
    }
}

/// Repeat the last hit so callers always receive `k` slots.
fn pad_to_k(mut hits: Vec<Neighbor>, k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
    let Some(last) = hits.last().map(|n| n.id) else {
        return Err(RetrievalError::IndexUnavailable(
            "collection returned no points".into(),
        ));
    };
    hits.resize(
        k,
        Neighbor {
            id: last,
            distance: f32::MAX,
        },
    );
    Ok(hits)
}
