//! Duecall dialogue crate - the call-time path.
//!
//! Provides intent classification, knowledge-question interrupts, per-call
//! sessions, and the dialogue state machine driving the reminder script.

pub mod answer;
pub mod engine;
pub mod error;
pub mod intent;
pub mod state;

pub use answer::{AnswerService, DynAnswerService, ExtractiveAnswerService, MockAnswerService};
pub use engine::DialogEngine;
pub use error::DialogError;
pub use intent::{Classifier, Intent, KeywordClassifier};
pub use state::{resumption_prompt, CallState, Session};
