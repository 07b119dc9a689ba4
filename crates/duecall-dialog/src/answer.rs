//! Answer-generation collaborator for knowledge questions.
//!
//! The dialogue engine treats the answerer as an opaque function from a raw
//! utterance to answer text. `ExtractiveAnswerService` is the default
//! backend over the persisted index; a generative collaborator slots in
//! behind the same trait.

use tracing::debug;

use duecall_kb::KnowledgeSearch;

use crate::error::DialogError;

/// Reply used when nothing can be retrieved.
const NO_ANSWER: &str =
    "I don't have that information right now, but our support team can help with it.";

/// External answer-generation collaborator.
pub trait AnswerService: Send + Sync {
    /// Answer a free-form knowledge question from the raw utterance.
    fn ask_general(
        &self,
        utterance: &str,
    ) -> impl std::future::Future<Output = Result<String, DialogError>> + Send;
}

/// Object-safe version of [`AnswerService`] for dynamic dispatch, with a
/// blanket impl mirroring the embedding-service seam.
pub trait DynAnswerService: Send + Sync {
    fn ask_general_boxed<'a>(
        &'a self,
        utterance: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<String, DialogError>> + Send + 'a>,
    >;
}

impl<T: AnswerService> DynAnswerService for T {
    fn ask_general_boxed<'a>(
        &'a self,
        utterance: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<String, DialogError>> + Send + 'a>,
    > {
        Box::pin(self.ask_general(utterance))
    }
}

// ---------------------------------------------------------------------------
// ExtractiveAnswerService - top retrieved chunk as the answer
// ---------------------------------------------------------------------------

/// Extractive answerer over the persisted knowledge index.
pub struct ExtractiveAnswerService {
    search: KnowledgeSearch,
    top_k: usize,
}

impl ExtractiveAnswerService {
    pub fn new(search: KnowledgeSearch, top_k: usize) -> Self {
        Self { search, top_k }
    }
}

impl AnswerService for ExtractiveAnswerService {
    async fn ask_general(&self, utterance: &str) -> Result<String, DialogError> {
        let retrieved = self
            .search
            .retrieve(utterance, self.top_k.max(1))
            .await
            .map_err(|e| DialogError::Retrieval(e.to_string()))?;

        match retrieved.first() {
            Some(chunk) => {
                debug!(
                    position = chunk.position,
                    distance = chunk.distance,
                    "Extractive answer selected"
                );
                Ok(chunk.text.clone())
            }
            None => Ok(NO_ANSWER.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockAnswerService - canned reply for tests
// ---------------------------------------------------------------------------

/// Mock answerer returning a fixed reply.
#[derive(Debug, Clone)]
pub struct MockAnswerService {
    reply: String,
}

impl MockAnswerService {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new("Here is what I found in the policy documents.")
    }
}

impl AnswerService for MockAnswerService {
    async fn ask_general(&self, _utterance: &str) -> Result<String, DialogError> {
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duecall_kb::{FlatIndex, IndexPipeline, KnowledgeSearch, MockEmbedding};

    #[tokio::test]
    async fn test_mock_answer_service() {
        let svc = MockAnswerService::new("canned");
        assert_eq!(svc.ask_general("what is this").await.unwrap(), "canned");
    }

    #[tokio::test]
    async fn test_dyn_answer_service() {
        let boxed: Box<dyn DynAnswerService> = Box::new(MockAnswerService::new("boxed"));
        assert_eq!(boxed.ask_general_boxed("q").await.unwrap(), "boxed");
    }

    #[tokio::test]
    async fn test_extractive_answer_returns_top_chunk() {
        let kb = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(
            kb.path().join("grace.txt"),
            "the grace period is thirty days from the due date",
        )
        .unwrap();
        IndexPipeline::new(MockEmbedding::new(), 500)
            .build(kb.path(), out.path())
            .await
            .unwrap();

        let search = KnowledgeSearch::load(out.path(), MockEmbedding::new()).unwrap();
        let svc = ExtractiveAnswerService::new(search, 3);
        let answer = svc.ask_general("what is the grace period?").await.unwrap();
        assert!(answer.contains("grace period"));
    }

    #[tokio::test]
    async fn test_extractive_answer_empty_index_falls_back() {
        let search = KnowledgeSearch::from_parts(
            FlatIndex::new(),
            Vec::new(),
            Box::new(MockEmbedding::new()),
        );
        let svc = ExtractiveAnswerService::new(search, 3);
        let answer = svc.ask_general("what is the grace period?").await.unwrap();
        assert_eq!(answer, NO_ANSWER);
    }
}
