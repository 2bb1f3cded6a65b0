//! Error types for the model client.

use cliniq_core::error::CliniqError;

/// Errors from the language-model client.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("missing API credential: set {0}")]
    MissingCredential(&'static str),
    #[error("unknown model backend: {0}")]
    UnknownBackend(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("completion contained no choices")]
    EmptyCompletion,
}

impl From<LlmError> for CliniqError {
    fn from(err: LlmError) -> Self {
        CliniqError::Llm(err.to_string())
    }
}
