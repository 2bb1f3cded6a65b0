pub mod config;
pub mod error;
pub mod triage;
pub mod types;

pub use config::CliniqConfig;
pub use error::{CliniqError, Result};
pub use triage::{TriageDecision, TriageRouter};
pub use types::*;
