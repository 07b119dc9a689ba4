//! Offline knowledge-base build pipeline.
//!
//! Reads the plain-text corpus, chunks it, embeds every chunk in order, and
//! persists a flat index with aligned chunk metadata. Runs as a one-shot
//! batch job, independent of any live call.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use duecall_core::error::{DuecallError, Result};

use crate::chunker::chunk_words;
use crate::embedding::EmbeddingService;
use crate::index::FlatIndex;

/// Result of an index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    /// Artifacts were written.
    Built { chunks: usize, dimensions: usize },
    /// The corpus contained no words; nothing was written.
    EmptyCorpus,
}

/// The knowledge-base indexing pipeline.
///
/// Corpus read -> chunk -> embed -> index -> persist. Rebuilding over
/// unchanged inputs is idempotent at the semantic level: the embedder is
/// deterministic per text, so nearest-neighbor results are reproduced.
pub struct IndexPipeline<E: EmbeddingService> {
    embedder: E,
    max_chunk_words: usize,
}

impl<E: EmbeddingService> IndexPipeline<E> {
    /// Create a pipeline with the given chunk size.
    pub fn new(embedder: E, max_chunk_words: usize) -> Self {
        Self {
            embedder,
            max_chunk_words,
        }
    }

    /// Create a pipeline with the default 500-word chunks.
    pub fn with_defaults(embedder: E) -> Self {
        Self::new(embedder, 500)
    }

    /// Build the index from every `.txt` file under `kb_dir` and persist the
    /// artifacts into `out_dir`.
    pub async fn build(&self, kb_dir: &Path, out_dir: &Path) -> Result<BuildOutcome> {
        let corpus = read_corpus(kb_dir)?;
        info!(characters = corpus.len(), "Knowledge corpus read");

        let chunks = chunk_words(&corpus, self.max_chunk_words);
        if chunks.is_empty() {
            warn!("Knowledge corpus is empty; no index written");
            return Ok(BuildOutcome::EmptyCorpus);
        }
        debug!(chunks = chunks.len(), max_words = self.max_chunk_words, "Corpus chunked");

        // Embed chunks one at a time, in order, so vectors[i] pairs with
        // chunks[i]; the index rejects any dimension drift.
        let mut index = FlatIndex::new();
        for chunk in &chunks {
            let vector = self.embedder.embed(chunk).await?;
            index.push(vector)?;
        }

        index.persist(out_dir, &chunks)?;

        info!(
            chunks = chunks.len(),
            dimensions = index.dimensions(),
            "Knowledge index built"
        );
        Ok(BuildOutcome::Built {
            chunks: chunks.len(),
            dimensions: index.dimensions(),
        })
    }
}

/// Concatenate every `.txt` document under `dir`, in directory listing
/// order, joined by newlines.
///
/// A missing or unreadable directory is fatal; an empty one is not.
fn read_corpus(dir: &Path) -> Result<String> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        DuecallError::Knowledge(format!(
            "cannot read knowledge directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut texts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DuecallError::Knowledge(e.to_string()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt") {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                DuecallError::Knowledge(format!("cannot read {}: {}", path.display(), e))
            })?;
            debug!(file = %path.display(), characters = content.len(), "Document read");
            texts.push(content);
        }
    }

    Ok(texts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbedding;
    use crate::index::FlatIndex;

    fn make_pipeline(max_words: usize) -> IndexPipeline<MockEmbedding> {
        IndexPipeline::new(MockEmbedding::new(), max_words)
    }

    #[tokio::test]
    async fn test_build_writes_aligned_artifacts() {
        let kb = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(kb.path().join("a.txt"), "one two three four").unwrap();

        let outcome = make_pipeline(2).build(kb.path(), out.path()).await.unwrap();
        assert_eq!(
            outcome,
            BuildOutcome::Built {
                chunks: 2,
                dimensions: 384
            }
        );

        let (index, chunks) = FlatIndex::load(out.path()).unwrap();
        assert_eq!(index.len(), chunks.len());
        assert_eq!(chunks, vec!["one two", "three four"]);
    }

    #[tokio::test]
    async fn test_build_empty_corpus_is_noop() {
        let kb = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let outcome = make_pipeline(500).build(kb.path(), out.path()).await.unwrap();
        assert_eq!(outcome, BuildOutcome::EmptyCorpus);
        assert!(FlatIndex::load(out.path()).is_err());
    }

    #[tokio::test]
    async fn test_build_whitespace_only_corpus_is_noop() {
        let kb = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(kb.path().join("blank.txt"), "  \n\t  ").unwrap();

        let outcome = make_pipeline(500).build(kb.path(), out.path()).await.unwrap();
        assert_eq!(outcome, BuildOutcome::EmptyCorpus);
    }

    #[tokio::test]
    async fn test_build_missing_kb_dir_is_fatal() {
        let out = tempfile::tempdir().unwrap();
        let result = make_pipeline(500)
            .build(Path::new("/nonexistent/kb"), out.path())
            .await;
        assert!(matches!(result, Err(DuecallError::Knowledge(_))));
    }

    #[tokio::test]
    async fn test_build_ignores_non_txt_files() {
        let kb = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(kb.path().join("doc.txt"), "policy terms here").unwrap();
        std::fs::write(kb.path().join("notes.md"), "should be ignored").unwrap();

        make_pipeline(500).build(kb.path(), out.path()).await.unwrap();
        let (_, chunks) = FlatIndex::load(out.path()).unwrap();
        assert_eq!(chunks, vec!["policy terms here"]);
    }

    #[tokio::test]
    async fn test_rebuild_is_semantically_idempotent() {
        let kb = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(
            kb.path().join("a.txt"),
            "grace period lasts thirty days after the due date",
        )
        .unwrap();

        let pipeline = make_pipeline(4);
        pipeline.build(kb.path(), out.path()).await.unwrap();
        let (index1, _) = FlatIndex::load(out.path()).unwrap();

        pipeline.build(kb.path(), out.path()).await.unwrap();
        let (index2, _) = FlatIndex::load(out.path()).unwrap();

        let query = MockEmbedding::hash_to_vector("grace period");
        let hits1 = index1.search(&query, 2).unwrap();
        let hits2 = index2.search(&query, 2).unwrap();
        let pos1: Vec<usize> = hits1.iter().map(|h| h.position).collect();
        let pos2: Vec<usize> = hits2.iter().map(|h| h.position).collect();
        assert_eq!(pos1, pos2);
    }
}
