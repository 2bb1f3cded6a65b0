use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CliniqError, Result};

/// Top-level configuration for the Cliniq application.
///
/// Loaded from `~/.cliniq/config.toml` by default. Each section corresponds
/// to a subsystem or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliniqConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub clinic: ClinicConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub triage: TriageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl CliniqConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CliniqConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CliniqError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Clinic identity used in prompts and the emergency instruction text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    /// Clinic name embedded in the assistant's system prompt.
    pub name: String,
    /// 24/7 urgent line quoted in the emergency instruction.
    pub urgent_line: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            name: "Good Health Clinic".to_string(),
            urgent_line: "+43 00 00 00".to_string(),
        }
    }
}

/// Conversation handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of prior turns sent to the model as context.
    pub context_turns: usize,
    /// Maximum message length in characters.
    pub max_message_chars: usize,
    /// Patient identifier used when none is given on the command line.
    pub default_patient_id: String,
    /// Conversation thread identifier used when none is given.
    pub default_thread_id: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_turns: 10,
            max_message_chars: 2000,
            default_patient_id: "1".to_string(),
            default_thread_id: "1".to_string(),
        }
    }
}

/// Triage routing settings.
///
/// The literal keyword "emergency" is always recognized; `extra_phrases`
/// adds clinic-specific urgent phrases on top of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Additional phrases that route to the emergency path (substring match,
    /// case-insensitive).
    pub extra_phrases: Vec<String>,
}

/// Language-model backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend: "openai" or "mock".
    pub backend: String,
    /// Model name passed to the completion API.
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.0,
            request_timeout_secs: 60,
        }
    }
}
