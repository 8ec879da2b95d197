//! Exact L2 search over a serialized flat index (`IxF2`) and its id array.
//!
//! Artifacts in the index directory:
//! - `recipe_index.faiss`: fourcc `IxF2`, header (`d`, `ntotal`, two
//!   reserved words, `is_trained`, `metric_type` and, for metrics above
//!   inner product and L2, a float argument), then a length-prefixed
//!   block of `ntotal * d` little-endian `f32`;
//! - `recipe_ids.npy`: `ntotal` recipe ids, position `i` labels vector `i`.
//!
//! Loaded once and searched read-only from any number of tasks.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::npy::read_i64_array;
use super::{Neighbor, SimilarityIndex};
use crate::errors::retrieval_error::RetrievalError;

pub const INDEX_FILE: &str = "recipe_index.faiss";
pub const IDS_FILE: &str = "recipe_ids.npy";

const FOURCC_FLAT_L2: &[u8; 4] = b"IxF2";
const METRIC_L2: i32 = 1;

/// Flat vectors plus their ids; shared with blocking search tasks.
#[derive(Debug)]
struct FlatData {
    dim: usize,
    vectors: Vec<f32>,
    ids: Vec<i64>,
}

/// In-memory exact nearest-neighbor index.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    data: Arc<FlatData>,
}

impl FlatL2Index {
    /// Load `recipe_index.faiss` and `recipe_ids.npy` from `dir`.
    ///
    /// # Errors
    /// `IndexUnavailable` if a file is missing or malformed, or the two
    /// artifacts disagree on the number of vectors.
    pub fn load(dir: &Path) -> Result<Self, RetrievalError> {
        let index_path = dir.join(INDEX_FILE);
        let ids_path = dir.join(IDS_FILE);

        let index_bytes = std::fs::read(&index_path).map_err(|e| {
            RetrievalError::IndexUnavailable(format!("{}: {e}", index_path.display()))
        })?;
        let ids_bytes = std::fs::read(&ids_path).map_err(|e| {
            RetrievalError::IndexUnavailable(format!("{}: {e}", ids_path.display()))
        })?;

        let (dim, vectors) = parse_flat_index(&index_bytes)?;
        let ids = read_i64_array(&ids_bytes)?;
        let index = Self::from_parts(dim, vectors, ids)?;

        info!(
            target: "recipe_retrieval::index",
            dir = %dir.display(),
            dim = index.dim(),
            ntotal = index.data.ids.len(),
            "flat index loaded"
        );
        Ok(index)
    }

    /// Build from raw row-major vectors and their ids.
    pub fn from_parts(dim: usize, vectors: Vec<f32>, ids: Vec<i64>) -> Result<Self, RetrievalError> {
        if dim == 0 {
            return Err(RetrievalError::IndexUnavailable("index dimension is 0".into()));
        }
        if vectors.len() % dim != 0 || vectors.len() / dim != ids.len() {
            return Err(RetrievalError::IndexUnavailable(format!(
                "index holds {} floats for dim {} but {} ids",
                vectors.len(),
                dim,
                ids.len()
            )));
        }
        if ids.is_empty() {
            return Err(RetrievalError::IndexUnavailable("index is empty".into()));
        }
        Ok(Self {
            data: Arc::new(FlatData { dim, vectors, ids }),
        })
    }

    pub fn dim(&self) -> usize {
        self.data.dim
    }
}

impl FlatData {
    fn search(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .chunks_exact(self.dim)
            .map(|row| {
                row.iter()
                    .zip(query)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f32>()
            })
            .enumerate()
            .collect();

        let by_distance =
            |a: &(usize, f32), b: &(usize, f32)| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0));
        if k < scored.len() {
            scored.select_nth_unstable_by(k, by_distance);
            scored.truncate(k);
        }
        scored.sort_unstable_by(by_distance);

        let mut out: Vec<Neighbor> = scored
            .into_iter()
            .map(|(pos, distance)| Neighbor {
                id: self.ids[pos],
                distance,
            })
            .collect();

        // Unfilled slots map to the last id, as a `-1` label would.
        if let Some(&last) = self.ids.last() {
            out.resize(
                k,
                Neighbor {
                    id: last,
                    distance: f32::MAX,
                },
            );
        }
        out
    }
}

#[async_trait]
impl SimilarityIndex for FlatL2Index {
    #[instrument(target = "recipe_retrieval::index", skip_all, fields(k = k))]
    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
        if vector.len() != self.data.dim {
            return Err(RetrievalError::IndexUnavailable(format!(
                "query vector length {} != index dimension {}",
                vector.len(),
                self.data.dim
            )));
        }
        let data = Arc::clone(&self.data);
        let query = vector.to_vec();
        let hits = tokio::task::spawn_blocking(move || data.search(&query, k))
            .await
            .map_err(|e| RetrievalError::IndexUnavailable(format!("search task failed: {e}")))?;

        debug!(
            target: "recipe_retrieval::index",
            returned = hits.len(),
            best = hits.first().map(|n| n.distance),
            "flat search done"
        );
        Ok(hits)
    }

    fn len(&self) -> Option<usize> {
        Some(self.data.ids.len())
    }
}

/// Little-endian cursor over the index file.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], RetrievalError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&e| e <= self.buf.len())
            .ok_or_else(|| corrupt("unexpected end of file"))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], RetrievalError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn i32(&mut self) -> Result<i32, RetrievalError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, RetrievalError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, RetrievalError> {
        Ok(u64::from_le_bytes(self.array()?))
    }
}

/// Parse an `IxF2` file into `(dim, row-major vectors)`.
fn parse_flat_index(bytes: &[u8]) -> Result<(usize, Vec<f32>), RetrievalError> {
    let mut r = Reader { buf: bytes, pos: 0 };

    let fourcc: [u8; 4] = r.array()?;
    if &fourcc != FOURCC_FLAT_L2 {
        return Err(corrupt(&format!(
            "unsupported index type {:?}, expected IxF2",
            String::from_utf8_lossy(&fourcc)
        )));
    }

    let dim = usize::try_from(r.i32()?).map_err(|_| corrupt("negative dimension"))?;
    let ntotal = usize::try_from(r.i64()?).map_err(|_| corrupt("negative ntotal"))?;
    let _reserved_a = r.i64()?;
    let _reserved_b = r.i64()?;
    let _is_trained = r.take(1)?;
    let metric = r.i32()?;
    if metric > 1 {
        let _metric_arg = r.take(4)?;
    }
    if metric != METRIC_L2 {
        return Err(corrupt(&format!("metric {metric} is not L2")));
    }

    let count = usize::try_from(r.u64()?).map_err(|_| corrupt("vector block too large"))?;
    let expected = ntotal
        .checked_mul(dim)
        .ok_or_else(|| corrupt("ntotal * d overflows"))?;
    if count != expected {
        return Err(corrupt(&format!(
            "vector block holds {count} floats, header says {ntotal} x {dim}"
        )));
    }

    let raw = r.take(count.checked_mul(4).ok_or_else(|| corrupt("vector block too large"))?)?;
    let vectors = raw
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok((dim, vectors))
}

fn corrupt(msg: &str) -> RetrievalError {
    RetrievalError::IndexUnavailable(format!("{INDEX_FILE}: {msg}"))
}

/// Serialize vectors in the `IxF2` layout.
#[cfg(test)]
pub(crate) fn write_flat_index(dim: usize, vectors: &[f32]) -> Vec<u8> {
    let ntotal = (vectors.len() / dim) as i64;
    let mut out = Vec::new();
    out.extend_from_slice(FOURCC_FLAT_L2);
    out.extend_from_slice(&(dim as i32).to_le_bytes());
    out.extend_from_slice(&ntotal.to_le_bytes());
    out.extend_from_slice(&(1i64 << 20).to_le_bytes());
    out.extend_from_slice(&(1i64 << 20).to_le_bytes());
    out.push(1);
    out.extend_from_slice(&METRIC_L2.to_le_bytes());
    out.extend_from_slice(&(vectors.len() as u64).to_le_bytes());
    for v in vectors {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_index::npy::write_i64_array;

    fn write_artifacts(dir: &Path, dim: usize, vectors: &[f32], ids: &[i64]) {
        std::fs::write(dir.join(INDEX_FILE), write_flat_index(dim, vectors)).unwrap();
        std::fs::write(dir.join(IDS_FILE), write_i64_array(ids)).unwrap();
    }

    #[tokio::test]
    async fn loads_artifacts_and_orders_by_distance() {
        let dir = tempfile::tempdir().unwrap();
        #[rustfmt::skip]
        let vectors = [
            0.0, 0.0,
            5.0, 5.0,
            1.0, 0.0,
            0.0, 2.0,
        ];
        write_artifacts(dir.path(), 2, &vectors, &[100, 200, 300, 400]);

        let index = FlatL2Index::load(dir.path()).unwrap();
        assert_eq!(index.len(), Some(4));

        let hits = index.search(&[0.9, 0.0], 3).await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![300, 100, 400]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!((hits[0].distance - 0.01).abs() < 1e-6);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let vectors = vec![1.0, 0.0, 0.0, 1.0, -1.0, 0.0];
        let index = FlatL2Index::from_parts(2, vectors, vec![7, 8, 9]).unwrap();
        let hits = index.search(&[0.0, 0.0], 3).await.unwrap();
        assert_eq!(hits.iter().map(|h| h.id).collect::<Vec<_>>(), vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn small_index_repeats_last_id_to_fill_k() {
        let index = FlatL2Index::from_parts(1, vec![0.0, 1.0], vec![11, 12]).unwrap();
        let hits = index.search(&[0.0], 5).await.unwrap();
        assert_eq!(hits.len(), 5);
        assert_eq!(
            hits.iter().map(|h| h.id).collect::<Vec<_>>(),
            vec![11, 12, 12, 12, 12]
        );
        assert_eq!(hits[4].distance, f32::MAX);
    }

    #[tokio::test]
    async fn wrong_query_dimension_is_index_unavailable() {
        let index = FlatL2Index::from_parts(2, vec![0.0, 0.0], vec![1]).unwrap();
        let err = index.search(&[0.0], 1).await.unwrap_err();
        assert!(matches!(err, RetrievalError::IndexUnavailable(_)));
    }

    #[test]
    fn missing_or_mismatched_artifacts_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FlatL2Index::load(dir.path()),
            Err(RetrievalError::IndexUnavailable(_))
        ));

        write_artifacts(dir.path(), 2, &[0.0, 0.0, 1.0, 1.0], &[1]);
        assert!(matches!(
            FlatL2Index::load(dir.path()),
            Err(RetrievalError::IndexUnavailable(_))
        ));
    }

    #[test]
    fn rejects_other_index_types() {
        let mut bytes = write_flat_index(1, &[0.0]);
        bytes[..4].copy_from_slice(b"IxFI");
        assert!(parse_flat_index(&bytes).is_err());
        assert!(parse_flat_index(&bytes[..10]).is_err());
    }
}
