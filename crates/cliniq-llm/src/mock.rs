//! Mock chat model for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use cliniq_core::types::ChatMessage;

use crate::error::LlmError;
use crate::model::ChatModel;

/// A model that answers from a script and records every prompt it sees.
///
/// Scripted replies are consumed in order; once exhausted (or when no
/// script was given) the fallback text is returned.
pub struct MockChatModel {
    scripted: Mutex<VecDeque<String>>,
    fallback: String,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    /// A mock that always answers with `reply`.
    pub fn canned(reply: impl Into<String>) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            fallback: reply.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A mock that answers with each entry of `replies` in turn.
    pub fn scripted(replies: Vec<String>) -> Self {
        Self {
            scripted: Mutex::new(replies.into()),
            fallback: "[mock reply]".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All prompts passed to [`ChatModel::complete`] so far.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::canned("[mock reply]")
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        let reply = self
            .scripted
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .unwrap_or_else(|| self.fallback.clone());
        Ok(reply)
    }
}
