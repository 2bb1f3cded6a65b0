//! Error types for the store.

use cliniq_core::error::CliniqError;

/// Errors from the in-memory store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<StoreError> for CliniqError {
    fn from(err: StoreError) -> Self {
        CliniqError::Store(err.to_string())
    }
}
