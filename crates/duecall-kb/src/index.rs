//! Positional flat vector index with brute-force Euclidean search.
//!
//! Vectors are stored by position; result position *i* maps back to chunk
//! metadata entry *i*. That alignment is the pipeline's core correctness
//! contract, so it is verified both on persist and on load.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use duecall_core::error::{DuecallError, Result};

/// File name of the persisted index.
pub const INDEX_FILE: &str = "kb_index.json";
/// File name of the companion chunk-text metadata.
pub const METADATA_FILE: &str = "chunk_metadata.json";

/// A single hit returned from an index search.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Position of the matching vector (and its chunk) in insertion order.
    pub position: usize,
    /// Euclidean distance to the query (0.0 for an exact match).
    pub distance: f32,
}

/// Flat nearest-neighbor index over equal-dimension vectors.
///
/// Search is a brute-force O(n) scan, which is acceptable for a knowledge
/// base of a few hundred chunks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index. The dimensionality is fixed by the first
    /// vector pushed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vector at the next position.
    ///
    /// The first push fixes the index dimensionality; any later vector of a
    /// different length is rejected rather than silently truncated.
    pub fn push(&mut self, vector: Vec<f32>) -> Result<()> {
        if vector.is_empty() {
            return Err(DuecallError::Index("cannot index an empty vector".to_string()));
        }
        if self.vectors.is_empty() {
            self.dimensions = vector.len();
        } else if vector.len() != self.dimensions {
            return Err(DuecallError::Index(format!(
                "vector dimension {} does not match index dimension {}",
                vector.len(),
                self.dimensions
            )));
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Search for the k nearest neighbors of the query by Euclidean distance.
    ///
    /// Returns hits sorted by ascending distance. An empty index yields an
    /// empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexHit>> {
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(DuecallError::Index(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut hits: Vec<IndexHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| IndexHit {
                position,
                distance: euclidean_distance(query, v),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);

        Ok(hits)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Persist the index and the aligned chunk metadata into `dir`,
    /// creating the directory if absent.
    ///
    /// Rejects a chunk list whose length differs from the vector count.
    pub fn persist(&self, dir: &Path, chunks: &[String]) -> Result<()> {
        if chunks.len() != self.vectors.len() {
            return Err(DuecallError::Index(format!(
                "{} chunks do not align with {} vectors",
                chunks.len(),
                self.vectors.len()
            )));
        }

        std::fs::create_dir_all(dir)?;
        let index_json = serde_json::to_string(self)?;
        std::fs::write(dir.join(INDEX_FILE), index_json)?;
        let metadata_json = serde_json::to_string_pretty(chunks)?;
        std::fs::write(dir.join(METADATA_FILE), metadata_json)?;

        info!(
            vectors = self.vectors.len(),
            dimensions = self.dimensions,
            dir = %dir.display(),
            "Index artifacts written"
        );
        Ok(())
    }

    /// Load the index and its chunk metadata from `dir`, re-verifying the
    /// positional alignment.
    pub fn load(dir: &Path) -> Result<(Self, Vec<String>)> {
        let index_json = std::fs::read_to_string(dir.join(INDEX_FILE)).map_err(|e| {
            DuecallError::Index(format!("cannot read index in {}: {}", dir.display(), e))
        })?;
        let index: FlatIndex = serde_json::from_str(&index_json)?;

        let metadata_json = std::fs::read_to_string(dir.join(METADATA_FILE)).map_err(|e| {
            DuecallError::Index(format!("cannot read metadata in {}: {}", dir.display(), e))
        })?;
        let chunks: Vec<String> = serde_json::from_str(&metadata_json)?;

        if chunks.len() != index.vectors.len() {
            return Err(DuecallError::Index(format!(
                "loaded {} chunks but {} vectors",
                chunks.len(),
                index.vectors.len()
            )));
        }

        Ok((index, chunks))
    }
}

/// Euclidean distance between two equal-length vectors.
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(dim: usize, hot: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; dim];
        v[hot] = 1.0;
        v
    }

    #[test]
    fn test_push_and_len() {
        let mut index = FlatIndex::new();
        index.push(unit(4, 0)).unwrap();
        index.push(unit(4, 1)).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.dimensions(), 4);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_push_dimension_mismatch_rejected() {
        let mut index = FlatIndex::new();
        index.push(unit(4, 0)).unwrap();
        let result = index.push(unit(5, 0));
        assert!(matches!(result, Err(DuecallError::Index(_))));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_push_empty_vector_rejected() {
        let mut index = FlatIndex::new();
        assert!(index.push(Vec::new()).is_err());
    }

    #[test]
    fn test_search_empty_index() {
        let index = FlatIndex::new();
        let hits = index.search(&[1.0, 0.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_query_dimension_mismatch() {
        let mut index = FlatIndex::new();
        index.push(unit(4, 0)).unwrap();
        assert!(index.search(&[1.0, 0.0], 1).is_err());
    }

    #[test]
    fn test_self_query_returns_self_at_distance_zero() {
        let mut index = FlatIndex::new();
        for hot in 0..5 {
            index.push(unit(8, hot)).unwrap();
        }

        let query = unit(8, 3);
        let hits = index.search(&query, 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 3);
        assert!(hits[0].distance.abs() < 1e-6);
    }

    #[test]
    fn test_search_sorted_ascending_and_truncated() {
        let mut index = FlatIndex::new();
        index.push(vec![0.0, 0.0]).unwrap();
        index.push(vec![1.0, 0.0]).unwrap();
        index.push(vec![3.0, 0.0]).unwrap();

        let hits = index.search(&[0.9, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].position, 1);
        assert_eq!(hits[1].position, 0);
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[test]
    fn test_persist_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut index = FlatIndex::new();
        let chunks = vec!["chunk zero".to_string(), "chunk one".to_string()];
        index.push(unit(6, 0)).unwrap();
        index.push(unit(6, 1)).unwrap();
        index.persist(dir.path(), &chunks).unwrap();

        let (loaded, loaded_chunks) = FlatIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded_chunks, chunks);

        // Querying with a stored vector returns its own position at distance 0.
        let hits = loaded.search(&unit(6, 1), 1).unwrap();
        assert_eq!(hits[0].position, 1);
        assert!(hits[0].distance.abs() < 1e-6);
    }

    #[test]
    fn test_persist_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("kb").join("artifacts");

        let mut index = FlatIndex::new();
        index.push(unit(3, 0)).unwrap();
        index.persist(&nested, &["one".to_string()]).unwrap();

        assert!(nested.join(INDEX_FILE).exists());
        assert!(nested.join(METADATA_FILE).exists());
    }

    #[test]
    fn test_persist_misaligned_chunks_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FlatIndex::new();
        index.push(unit(3, 0)).unwrap();

        let result = index.persist(dir.path(), &[]);
        assert!(matches!(result, Err(DuecallError::Index(_))));
    }

    #[test]
    fn test_load_missing_artifacts_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FlatIndex::load(dir.path()).is_err());
    }

    #[test]
    fn test_load_misaligned_artifacts_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FlatIndex::new();
        index.push(unit(3, 0)).unwrap();
        index.persist(dir.path(), &["one".to_string()]).unwrap();

        // Tamper with the metadata so it no longer aligns.
        std::fs::write(dir.path().join(METADATA_FILE), r#"["one", "two"]"#).unwrap();
        assert!(matches!(
            FlatIndex::load(dir.path()),
            Err(DuecallError::Index(_))
        ));
    }

    #[test]
    fn test_euclidean_distance() {
        assert!((euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(euclidean_distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }
}
