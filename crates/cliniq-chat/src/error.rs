//! Error types for the conversational core.

use cliniq_core::error::CliniqError;
use cliniq_llm::LlmError;
use cliniq_store::StoreError;

/// Errors from the chat flow.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("model error: {0}")]
    Llm(#[from] LlmError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<ChatError> for CliniqError {
    fn from(err: ChatError) -> Self {
        CliniqError::Chat(err.to_string())
    }
}
