use thiserror::Error;

/// Top-level error type for the Duecall system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types where needed and implement `From<DuecallError>` so
/// that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DuecallError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Customer store error: {0}")]
    CustomerStore(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for DuecallError {
    fn from(err: toml::de::Error) -> Self {
        DuecallError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DuecallError {
    fn from(err: toml::ser::Error) -> Self {
        DuecallError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DuecallError {
    fn from(err: serde_json::Error) -> Self {
        DuecallError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Duecall operations.
pub type Result<T> = std::result::Result<T, DuecallError>;
