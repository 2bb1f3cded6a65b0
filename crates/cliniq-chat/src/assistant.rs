//! Conversation orchestrator for the clinic assistant.
//!
//! Handles one message at a time: validate, record the turn, triage,
//! dispatch to the emergency or model-call handler, then update the
//! patient's stored profile from the new conversation turns.

use std::sync::Arc;

use cliniq_core::config::{ChatConfig, CliniqConfig, ClinicConfig};
use cliniq_core::triage::{TriageDecision, TriageRouter};
use cliniq_core::types::ChatMessage;
use cliniq_llm::ChatModel;
use cliniq_store::memory::PATIENT_PROFILE_KEY;
use cliniq_store::{ConversationSaver, InMemoryStore, Namespace};

use crate::error::ChatError;
use crate::prompts;

/// The reply produced for one handled message.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub decision: TriageDecision,
}

/// Central orchestrator wiring triage, the model, and the patient store.
pub struct CareAssistant {
    router: TriageRouter,
    model: Arc<dyn ChatModel>,
    store: Arc<InMemoryStore>,
    saver: ConversationSaver,
    clinic: ClinicConfig,
    chat: ChatConfig,
}

impl CareAssistant {
    /// Create a new assistant from configuration, a model, and a store.
    pub fn new(config: &CliniqConfig, model: Arc<dyn ChatModel>, store: Arc<InMemoryStore>) -> Self {
        Self {
            router: TriageRouter::new(config.triage.clone()),
            model,
            store,
            saver: ConversationSaver::new(),
            clinic: config.clinic.clone(),
            chat: config.chat.clone(),
        }
    }

    /// Handle an incoming patient message and return the reply.
    ///
    /// The turn order in the transcript is strictly user, assistant.
    /// The profile update runs after the reply is recorded; a failure
    /// there is logged and leaves the stored profile unchanged.
    pub async fn handle_message(
        &self,
        thread_id: &str,
        patient_id: &str,
        text: &str,
    ) -> Result<AssistantReply, ChatError> {
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.chat.max_message_chars {
            return Err(ChatError::MessageTooLong(self.chat.max_message_chars));
        }

        self.saver.append(thread_id, ChatMessage::user(text))?;

        let decision = self.router.route(text);
        let reply_text = match decision {
            TriageDecision::Emergency => {
                tracing::warn!(patient_id, "Emergency detected; returning urgent instructions");
                prompts::emergency_instruction(&self.clinic.urgent_line)
            }
            TriageDecision::Regular => self.call_model(thread_id, patient_id).await?,
        };

        self.saver
            .append(thread_id, ChatMessage::assistant(reply_text.clone()))?;

        if let Err(e) = self.update_profile(thread_id, patient_id).await {
            tracing::warn!(error = %e, patient_id, "Profile update failed; keeping previous profile");
        }

        Ok(AssistantReply {
            text: reply_text,
            decision,
        })
    }

    /// The stored profile text for a patient, if any.
    pub fn profile(&self, patient_id: &str) -> Result<Option<String>, ChatError> {
        let namespace = Namespace::patient_interactions(patient_id);
        let stored = self.store.get(&namespace, PATIENT_PROFILE_KEY)?;
        Ok(stored.and_then(|s| s.value.as_str().map(|t| t.to_string())))
    }

    /// The full transcript of a thread, oldest first.
    pub fn transcript(&self, thread_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.saver.history(thread_id)?)
    }

    // -- Private helpers --

    /// Generate the assistant reply, leveraging the stored profile for context.
    async fn call_model(&self, thread_id: &str, patient_id: &str) -> Result<String, ChatError> {
        let profile = self
            .profile(patient_id)?
            .unwrap_or_else(|| prompts::DEFAULT_PROFILE.to_string());
        let system = prompts::assistant_system_prompt(&self.clinic.name, &profile);

        let mut messages = vec![ChatMessage::system(system)];
        messages.extend(self.context_window(thread_id)?);

        let reply = self.model.complete(&messages).await?;
        Ok(reply)
    }

    /// Ask the model for an updated profile and write it to the store.
    async fn update_profile(&self, thread_id: &str, patient_id: &str) -> Result<(), ChatError> {
        let namespace = Namespace::patient_interactions(patient_id);
        let history = self
            .profile(patient_id)?
            .unwrap_or_else(|| prompts::DEFAULT_HISTORY.to_string());
        let instruction = prompts::profile_update_prompt(&history);

        let mut messages = vec![ChatMessage::system(instruction)];
        messages.extend(self.context_window(thread_id)?);

        let updated = self.model.complete(&messages).await?;
        self.store.put(
            &namespace,
            PATIENT_PROFILE_KEY,
            serde_json::Value::String(updated),
        )?;

        tracing::debug!(patient_id, "Patient profile updated");
        Ok(())
    }

    /// The recent turns sent to the model; always includes the current
    /// message even when `context_turns` is zero.
    fn context_window(&self, thread_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self
            .saver
            .recent(thread_id, self.chat.context_turns.max(1))?)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cliniq_core::config::TriageConfig;
    use cliniq_core::types::Role;
    use cliniq_llm::{LlmError, MockChatModel};

    /// A model whose every call fails.
    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
            Err(LlmError::EmptyCompletion)
        }
    }

    fn make_assistant(model: Arc<dyn ChatModel>) -> CareAssistant {
        CareAssistant::new(&CliniqConfig::default(), model, Arc::new(InMemoryStore::new()))
    }

    fn make_assistant_with_config(
        config: CliniqConfig,
        model: Arc<dyn ChatModel>,
    ) -> CareAssistant {
        CareAssistant::new(&config, model, Arc::new(InMemoryStore::new()))
    }

    // ---- Validation ----

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let assistant = make_assistant(Arc::new(MockChatModel::default()));
        let result = assistant.handle_message("1", "1", "").await;
        assert!(matches!(result, Err(ChatError::EmptyMessage)));
    }

    #[tokio::test]
    async fn test_message_too_long_rejected() {
        let assistant = make_assistant(Arc::new(MockChatModel::default()));
        let long = "a".repeat(2001);
        let result = assistant.handle_message("1", "1", &long).await;
        assert!(matches!(result, Err(ChatError::MessageTooLong(2000))));
    }

    #[tokio::test]
    async fn test_message_at_max_length_ok() {
        let assistant = make_assistant(Arc::new(MockChatModel::default()));
        let msg = "a".repeat(2000);
        assert!(assistant.handle_message("1", "1", &msg).await.is_ok());
    }

    // ---- Emergency path ----

    #[tokio::test]
    async fn test_emergency_message_returns_fixed_text() {
        let assistant = make_assistant(Arc::new(MockChatModel::default()));
        let reply = assistant
            .handle_message("1", "1", "This is an emergency! Severe chest pain.")
            .await
            .unwrap();

        assert_eq!(reply.decision, TriageDecision::Emergency);
        assert!(reply.text.contains("We've detected an emergency."));
        assert!(reply.text.contains("+43 00 00 00"));
    }

    #[tokio::test]
    async fn test_emergency_is_case_insensitive() {
        let assistant = make_assistant(Arc::new(MockChatModel::default()));
        let reply = assistant
            .handle_message("1", "1", "EMERGENCY, please help")
            .await
            .unwrap();
        assert_eq!(reply.decision, TriageDecision::Emergency);
    }

    #[tokio::test]
    async fn test_emergency_reply_does_not_come_from_model() {
        // Scripted mock: any model-generated reply would surface "scripted".
        let model = Arc::new(MockChatModel::canned("scripted"));
        let assistant = make_assistant(model.clone());
        let reply = assistant
            .handle_message("1", "1", "emergency")
            .await
            .unwrap();

        assert!(!reply.text.contains("scripted"));
        // The model is still consulted once, for the profile update.
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_emergency_uses_configured_urgent_line() {
        let mut config = CliniqConfig::default();
        config.clinic.urgent_line = "+1 555 123 4567".to_string();
        let assistant =
            make_assistant_with_config(config, Arc::new(MockChatModel::default()));

        let reply = assistant
            .handle_message("1", "1", "emergency")
            .await
            .unwrap();
        assert!(reply.text.contains("+1 555 123 4567"));
    }

    // ---- Regular path ----

    #[tokio::test]
    async fn test_regular_message_returns_model_reply() {
        let model = Arc::new(MockChatModel::canned("Tuesday at 10 AM works."));
        let assistant = make_assistant(model);
        let reply = assistant
            .handle_message("1", "1", "Can I book a check-up next Tuesday?")
            .await
            .unwrap();

        assert_eq!(reply.decision, TriageDecision::Regular);
        assert_eq!(reply.text, "Tuesday at 10 AM works.");
    }

    #[tokio::test]
    async fn test_regular_path_system_prompt_has_clinic_and_default_profile() {
        let model = Arc::new(MockChatModel::default());
        let assistant = make_assistant(model.clone());
        assistant
            .handle_message("1", "1", "hello, I'm Taher")
            .await
            .unwrap();

        let calls = model.calls();
        // First call is the reply generation.
        let system = &calls[0][0];
        assert_eq!(system.role, Role::System);
        assert!(system.content.contains("Good Health Clinic"));
        assert!(system.content.contains(prompts::DEFAULT_PROFILE));
    }

    #[tokio::test]
    async fn test_model_failure_on_regular_path_propagates() {
        let assistant = make_assistant(Arc::new(FailingModel));
        let result = assistant.handle_message("1", "1", "book me in").await;
        assert!(matches!(result, Err(ChatError::Llm(_))));
    }

    // ---- Profile writing ----

    #[tokio::test]
    async fn test_profile_written_after_turn() {
        let model = Arc::new(MockChatModel::scripted(vec![
            "Sure, Tuesday works.".to_string(),
            "Patient wants a Tuesday check-up.".to_string(),
        ]));
        let assistant = make_assistant(model);
        assistant
            .handle_message("1", "1", "Book me Tuesday please")
            .await
            .unwrap();

        let profile = assistant.profile("1").unwrap().unwrap();
        assert_eq!(profile, "Patient wants a Tuesday check-up.");
    }

    #[tokio::test]
    async fn test_profile_written_on_emergency_path_too() {
        let model = Arc::new(MockChatModel::canned("Emergency noted in profile."));
        let assistant = make_assistant(model);
        assistant
            .handle_message("1", "1", "emergency")
            .await
            .unwrap();

        let profile = assistant.profile("1").unwrap().unwrap();
        assert_eq!(profile, "Emergency noted in profile.");
    }

    #[tokio::test]
    async fn test_profile_update_uses_default_history_marker_first_time() {
        let model = Arc::new(MockChatModel::default());
        let assistant = make_assistant(model.clone());
        assistant.handle_message("1", "1", "hello").await.unwrap();

        let calls = model.calls();
        // Second call is the profile update.
        let instruction = &calls[1][0];
        assert!(instruction.content.contains("CURRENT PROFILE:"));
        assert!(instruction.content.contains(prompts::DEFAULT_HISTORY));
    }

    #[tokio::test]
    async fn test_profile_update_sees_existing_profile_next_turn() {
        let model = Arc::new(MockChatModel::scripted(vec![
            "reply one".to_string(),
            "profile after turn one".to_string(),
            "reply two".to_string(),
            "profile after turn two".to_string(),
        ]));
        let assistant = make_assistant(model.clone());
        assistant.handle_message("1", "1", "first").await.unwrap();
        assistant.handle_message("1", "1", "second").await.unwrap();

        let calls = model.calls();
        // Fourth call: profile update of turn two sees turn one's profile.
        let instruction = &calls[3][0];
        assert!(instruction.content.contains("profile after turn one"));

        assert_eq!(
            assistant.profile("1").unwrap().unwrap(),
            "profile after turn two"
        );
    }

    #[tokio::test]
    async fn test_emergency_reply_survives_profile_update_failure() {
        let assistant = make_assistant(Arc::new(FailingModel));
        let reply = assistant
            .handle_message("1", "1", "emergency")
            .await
            .unwrap();

        assert!(reply.text.contains("We've detected an emergency."));
        // Update failed, so no profile was stored.
        assert!(assistant.profile("1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profiles_are_per_patient() {
        let model = Arc::new(MockChatModel::canned("shared reply"));
        let assistant = make_assistant(model);
        assistant.handle_message("t1", "alice", "hello").await.unwrap();

        assert!(assistant.profile("alice").unwrap().is_some());
        assert!(assistant.profile("bob").unwrap().is_none());
    }

    // ---- Transcript ----

    #[tokio::test]
    async fn test_transcript_order_user_assistant() {
        let assistant = make_assistant(Arc::new(MockChatModel::canned("ok")));
        assistant.handle_message("1", "1", "first").await.unwrap();
        assistant.handle_message("1", "1", "second").await.unwrap();

        let transcript = assistant.transcript("1").unwrap();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].content, "first");
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[2].role, Role::User);
        assert_eq!(transcript[2].content, "second");
        assert_eq!(transcript[3].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_transcript_records_emergency_reply() {
        let assistant = make_assistant(Arc::new(MockChatModel::default()));
        assistant.handle_message("1", "1", "emergency").await.unwrap();

        let transcript = assistant.transcript("1").unwrap();
        assert_eq!(transcript.len(), 2);
        assert!(transcript[1].content.contains("We've detected an emergency."));
    }

    #[tokio::test]
    async fn test_threads_do_not_share_transcripts() {
        let assistant = make_assistant(Arc::new(MockChatModel::canned("ok")));
        assistant.handle_message("a", "1", "in thread a").await.unwrap();

        assert_eq!(assistant.transcript("a").unwrap().len(), 2);
        assert!(assistant.transcript("b").unwrap().is_empty());
    }

    // ---- Context window ----

    #[tokio::test]
    async fn test_second_turn_includes_prior_context() {
        let model = Arc::new(MockChatModel::canned("ok"));
        let assistant = make_assistant(model.clone());
        assistant.handle_message("1", "1", "first question").await.unwrap();
        assistant.handle_message("1", "1", "follow-up").await.unwrap();

        let calls = model.calls();
        // Third call is the second turn's reply generation: system + context.
        let contents: Vec<&str> = calls[2].iter().map(|m| m.content.as_str()).collect();
        assert!(contents.iter().any(|c| c.contains("first question")));
        assert!(contents.iter().any(|c| c.contains("follow-up")));
    }

    #[tokio::test]
    async fn test_context_window_bounded_by_config() {
        let mut config = CliniqConfig::default();
        config.chat.context_turns = 1;
        let model = Arc::new(MockChatModel::canned("ok"));
        let assistant = make_assistant_with_config(config, model.clone());

        assistant.handle_message("1", "1", "first").await.unwrap();
        assistant.handle_message("1", "1", "second").await.unwrap();

        let calls = model.calls();
        // Second turn's reply call: system prompt + exactly one recent message.
        assert_eq!(calls[2].len(), 2);
        assert_eq!(calls[2][1].content, "second");
    }

    #[tokio::test]
    async fn test_zero_context_turns_still_sends_current_message() {
        let mut config = CliniqConfig::default();
        config.chat.context_turns = 0;
        let model = Arc::new(MockChatModel::canned("ok"));
        let assistant = make_assistant_with_config(config, model.clone());

        assistant.handle_message("1", "1", "hello").await.unwrap();

        let calls = model.calls();
        assert_eq!(calls[0].len(), 2);
        assert_eq!(calls[0][1].content, "hello");
    }

    // ---- Extra triage phrases ----

    #[tokio::test]
    async fn test_extra_triage_phrase_routes_emergency() {
        let mut config = CliniqConfig::default();
        config.triage = TriageConfig {
            extra_phrases: vec!["severe chest pain".to_string()],
        };
        let assistant =
            make_assistant_with_config(config, Arc::new(MockChatModel::default()));

        let reply = assistant
            .handle_message("1", "1", "I'm experiencing severe chest pain.")
            .await
            .unwrap();
        assert_eq!(reply.decision, TriageDecision::Emergency);
    }
}
