//! Triage gate for routing patient messages.
//!
//! Inspects an incoming message before it reaches the assistant and
//! decides whether it takes the emergency path or the regular
//! model-call path.

use crate::config::TriageConfig;

/// Keyword that always routes to the emergency path.
const EMERGENCY_KEYWORD: &str = "emergency";

/// Routing decision for an incoming patient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageDecision {
    /// The message indicates an emergency; respond with urgent instructions.
    Emergency,
    /// Regular conversation; forward to the model-call path.
    Regular,
}

/// Router that checks a message for emergency indicators.
///
/// Matching is case-insensitive substring containment: the message is
/// lowercased once, then checked against the built-in keyword and any
/// configured extra phrases.
pub struct TriageRouter {
    config: TriageConfig,
}

impl TriageRouter {
    /// Create a new router with the given configuration.
    pub fn new(config: TriageConfig) -> Self {
        Self { config }
    }

    /// Decide the route for a message.
    pub fn route(&self, message: &str) -> TriageDecision {
        let lowered = message.to_lowercase();

        if lowered.contains(EMERGENCY_KEYWORD) {
            return TriageDecision::Emergency;
        }

        for phrase in &self.config.extra_phrases {
            if !phrase.is_empty() && lowered.contains(&phrase.to_lowercase()) {
                return TriageDecision::Emergency;
            }
        }

        TriageDecision::Regular
    }

    /// Convenience: `true` when the message routes to the emergency path.
    pub fn is_emergency(&self, message: &str) -> bool {
        self.route(message) == TriageDecision::Emergency
    }
}
