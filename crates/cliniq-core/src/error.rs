use thiserror::Error;

/// Top-level error type for the Cliniq system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for CliniqError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliniqError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Model error: {0}")]
    Llm(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CliniqError {
    fn from(err: toml::de::Error) -> Self {
        CliniqError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CliniqError {
    fn from(err: toml::ser::Error) -> Self {
        CliniqError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CliniqError {
    fn from(err: serde_json::Error) -> Self {
        CliniqError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Cliniq operations.
pub type Result<T> = std::result::Result<T, CliniqError>;
