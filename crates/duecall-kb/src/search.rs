//! Call-time knowledge search over persisted index artifacts.
//!
//! Combines a boxed embedding service (to embed queries) with the loaded
//! [`FlatIndex`] and its chunk metadata, mapping hit positions back to chunk
//! texts.

use std::path::Path;

use tracing::debug;

use duecall_core::error::Result;

use crate::embedding::{DynEmbeddingService, EmbeddingService};
use crate::index::FlatIndex;

/// A retrieved knowledge chunk with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    /// Position of the chunk in the persisted sequence.
    pub position: usize,
    /// Euclidean distance to the query.
    pub distance: f32,
    /// The chunk text.
    pub text: String,
}

/// Knowledge search over a loaded index.
///
/// Uses dynamic dispatch (`Box<dyn DynEmbeddingService>`) so that production
/// code can supply a real model backend while tests use `MockEmbedding`.
pub struct KnowledgeSearch {
    index: FlatIndex,
    chunks: Vec<String>,
    embedder: Box<dyn DynEmbeddingService>,
}

impl KnowledgeSearch {
    /// Load persisted artifacts from `dir` and pair them with an embedder.
    pub fn load(dir: &Path, embedder: impl EmbeddingService + 'static) -> Result<Self> {
        let (index, chunks) = FlatIndex::load(dir)?;
        Ok(Self {
            index,
            chunks,
            embedder: Box::new(embedder),
        })
    }

    /// Build a search over in-memory parts (used by tests).
    pub fn from_parts(
        index: FlatIndex,
        chunks: Vec<String>,
        embedder: Box<dyn DynEmbeddingService>,
    ) -> Self {
        Self {
            index,
            chunks,
            embedder,
        }
    }

    /// Embed the query and return the k nearest chunks, closest first.
    ///
    /// An empty index yields an empty result rather than an error.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed_boxed(query).await?;
        let hits = self.index.search(&query_vec, k)?;
        debug!(query, hits = hits.len(), "Knowledge retrieval");

        Ok(hits
            .into_iter()
            .map(|hit| RetrievedChunk {
                position: hit.position,
                distance: hit.distance,
                text: self.chunks[hit.position].clone(),
            })
            .collect())
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
