//! Error types for the dialogue engine.

use duecall_core::error::DuecallError;

/// Errors from the call-time path.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("retrieval error: {0}")]
    Retrieval(String),
    #[error("core error: {0}")]
    Core(#[from] DuecallError),
}
