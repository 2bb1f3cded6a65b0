//! CLI argument definitions for the Cliniq application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Cliniq — a clinic chat assistant with emergency triage and patient memory.
#[derive(Parser, Debug)]
#[command(name = "cliniq", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Patient identifier for this session.
    #[arg(short = 'p', long = "patient-id")]
    pub patient_id: Option<String>,

    /// Conversation thread identifier for this session.
    #[arg(short = 't', long = "thread-id")]
    pub thread_id: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Model backend override: "openai" or "mock".
    #[arg(long = "model-backend")]
    pub model_backend: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CLINIQ_CONFIG env var > platform default
    /// (~/.cliniq/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CLINIQ_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".cliniq").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cliniq").join("config.toml");
    }
    PathBuf::from("config.toml")
}
