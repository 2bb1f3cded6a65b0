//! Language-model client for Cliniq.
//!
//! Defines the [`ChatModel`] trait the assistant talks to, an
//! OpenAI-compatible HTTP implementation, a mock implementation for
//! tests and offline use, and a factory that selects the backend from
//! configuration.

pub mod error;
pub mod mock;
pub mod model;
pub mod openai;

pub use error::LlmError;
pub use mock::MockChatModel;
pub use model::{create_chat_model, ChatModel};
pub use openai::{OpenAiChatModel, API_KEY_ENV};
