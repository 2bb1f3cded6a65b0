//! Per-thread conversation checkpointing.
//!
//! Keeps the transcript of each conversation thread for the lifetime of
//! the process, so follow-up messages within a session see the turns
//! that came before them.

use std::collections::HashMap;
use std::sync::Mutex;

use cliniq_core::types::ChatMessage;

use crate::error::StoreError;

/// In-memory transcript keeper, one message list per thread ID.
#[derive(Default)]
pub struct ConversationSaver {
    threads: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl ConversationSaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a thread's transcript, creating the thread on
    /// first use.
    pub fn append(&self, thread_id: &str, message: ChatMessage) -> Result<(), StoreError> {
        let mut threads = self
            .threads
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        threads
            .entry(thread_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    /// The full transcript of a thread, oldest first. Empty for unknown
    /// threads.
    pub fn history(&self, thread_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let threads = self
            .threads
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(threads.get(thread_id).cloned().unwrap_or_default())
    }

    /// The most recent `limit` messages of a thread, oldest first.
    pub fn recent(&self, thread_id: &str, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let threads = self
            .threads
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let messages = match threads.get(thread_id) {
            Some(m) => m,
            None => return Ok(Vec::new()),
        };
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    /// Number of messages recorded for a thread.
    pub fn message_count(&self, thread_id: &str) -> Result<usize, StoreError> {
        let threads = self
            .threads
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(threads.get(thread_id).map(|m| m.len()).unwrap_or(0))
    }

    /// Drop a thread's transcript. Returns `true` if the thread existed.
    pub fn clear(&self, thread_id: &str) -> Result<bool, StoreError> {
        let mut threads = self
            .threads
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(threads.remove(thread_id).is_some())
    }

    /// IDs of all threads with recorded messages, sorted.
    pub fn thread_ids(&self) -> Result<Vec<String>, StoreError> {
        let threads = self
            .threads
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut ids: Vec<String> = threads.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
