//! Duecall knowledge-base crate - chunking, embeddings, flat index, and the
//! offline build pipeline.
//!
//! Turns a directory of plain-text knowledge documents into a persisted
//! nearest-neighbor index with positionally aligned chunk metadata, and
//! provides the call-time search over those artifacts.

pub mod chunker;
pub mod embedding;
pub mod index;
pub mod pipeline;
pub mod search;

pub use chunker::chunk_words;
pub use embedding::{DynEmbeddingService, EmbeddingService, MockEmbedding};
pub use index::{FlatIndex, IndexHit};
pub use pipeline::{BuildOutcome, IndexPipeline};
pub use search::{KnowledgeSearch, RetrievedChunk};
