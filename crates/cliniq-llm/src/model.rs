//! The chat model abstraction and backend factory.

use std::sync::Arc;

use async_trait::async_trait;

use cliniq_core::config::LlmConfig;
use cliniq_core::types::ChatMessage;

use crate::error::LlmError;
use crate::mock::MockChatModel;
use crate::openai::OpenAiChatModel;

/// A chat-completion model.
///
/// Implementations take the full prompt (system + conversation messages)
/// and return the assistant's reply text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for the given messages.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Human-readable backend/model name, for logging.
    fn name(&self) -> &str;
}

/// Build a chat model from configuration.
///
/// `backend = "openai"` requires the `OPENAI_API_KEY` environment
/// variable; `backend = "mock"` needs no credential and answers with
/// canned text.
pub fn create_chat_model(config: &LlmConfig) -> Result<Arc<dyn ChatModel>, LlmError> {
    match config.backend.as_str() {
        "openai" => {
            let model = OpenAiChatModel::from_env(config)?;
            Ok(Arc::new(model))
        }
        "mock" => Ok(Arc::new(MockChatModel::default())),
        other => Err(LlmError::UnknownBackend(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_mock_backend() {
        let config = LlmConfig {
            backend: "mock".to_string(),
            ..LlmConfig::default()
        };
        let model = create_chat_model(&config).unwrap();
        assert_eq!(model.name(), "mock");
    }

    #[test]
    fn test_factory_unknown_backend() {
        let config = LlmConfig {
            backend: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        };
        let result = create_chat_model(&config);
        assert!(matches!(result, Err(LlmError::UnknownBackend(_))));
    }
}
