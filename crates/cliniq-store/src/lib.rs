//! In-process storage for Cliniq.
//!
//! Provides the namespaced key-value store holding patient data across
//! conversation threads, and the per-thread conversation checkpoint that
//! keeps the transcript of the current session. Both live entirely in
//! memory; nothing survives the process.

pub mod checkpoint;
pub mod error;
pub mod memory;

pub use checkpoint::ConversationSaver;
pub use error::StoreError;
pub use memory::{InMemoryStore, Namespace, StoredValue};
