//! Keyword-based utterance classification.
//!
//! Two independent checks share one seam: intent classification for the
//! state machine, and knowledge-question detection for the retrieval
//! interrupt. Both operate on normalized (trimmed, lowercased) text via
//! substring membership, so a learned classifier can replace the whole
//! [`Classifier`] without touching the state machine.

/// Closed set of call intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Agree,
    Refuse,
    Paid,
    PaymentMode,
    Other,
}

/// Pluggable utterance classification seam.
pub trait Classifier: Send + Sync {
    /// Map a normalized utterance to an [`Intent`].
    fn intent(&self, normalized: &str) -> Intent;

    /// True if the normalized utterance is a knowledge question,
    /// independent of any dialogue state.
    fn is_knowledge_question(&self, normalized: &str) -> bool;
}

const AGREE_WORDS: &[&str] = &["yes", "sure", "okay", "agree"];
const REFUSE_WORDS: &[&str] = &["no", "not now", "later", "can't", "unable"];
const PAID_WORDS: &[&str] = &["paid", "last week", "already"];
const PAYMENT_MODE_WORDS: &[&str] = &["online", "cash", "cheque"];

const KNOWLEDGE_WORDS: &[&str] = &[
    "term insurance",
    "insurance",
    "policy",
    "premium",
    "benefit",
    "sum assured",
    "coverage",
    "claim",
    "maturity",
    "grace period",
    "due date",
    "what",
    "why",
    "how",
];

/// Substring-membership classifier with fixed precedence.
///
/// Intent checks run in agree -> refuse -> paid -> payment-mode order, first
/// match wins, so an utterance containing both an agree-word and a
/// refuse-word classifies Agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

impl Classifier for KeywordClassifier {
    fn intent(&self, normalized: &str) -> Intent {
        if contains_any(normalized, AGREE_WORDS) {
            return Intent::Agree;
        }
        if contains_any(normalized, REFUSE_WORDS) {
            return Intent::Refuse;
        }
        if contains_any(normalized, PAID_WORDS) {
            return Intent::Paid;
        }
        if contains_any(normalized, PAYMENT_MODE_WORDS) {
            return Intent::PaymentMode;
        }
        Intent::Other
    }

    fn is_knowledge_question(&self, normalized: &str) -> bool {
        contains_any(normalized, KNOWLEDGE_WORDS)
    }
}

/// Normalize an utterance for classification: trim and lowercase.
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}
