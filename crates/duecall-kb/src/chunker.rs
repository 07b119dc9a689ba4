//! Word-window chunker for the knowledge corpus.
//!
//! Documents are concatenated before chunking, so chunk order equals
//! document-concatenation order and boundaries are purely word-count based.

/// Split text into consecutive, non-overlapping windows of at most
/// `max_words` whitespace-delimited tokens.
///
/// The final chunk may be shorter. Deterministic: the same input and
/// `max_words` always yield the same chunk sequence. Empty or
/// whitespace-only input yields an empty sequence.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    if max_words == 0 {
        return Vec::new();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words)
        .map(|window| window.join(" "))
        .collect()
}
