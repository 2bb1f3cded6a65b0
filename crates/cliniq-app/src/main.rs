//! Cliniq application binary - composition root.
//!
//! Ties together the Cliniq crates into a single executable:
//! 1. Parse CLI arguments
//! 2. Load configuration from TOML
//! 3. Initialize tracing
//! 4. Build the store, the chat model, and the assistant
//! 5. Run the interactive console loop

use std::io::Write as _;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use cliniq_chat::CareAssistant;
use cliniq_core::config::CliniqConfig;
use cliniq_llm::create_chat_model;
use cliniq_store::InMemoryStore;

mod cli;
use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is loaded before tracing so the config file can supply the
    // default log level; flag and RUST_LOG take precedence.
    let config_file = args.resolve_config_path();
    let mut config = CliniqConfig::load_or_default(&config_file);

    let filter = if let Some(ref level) = args.log_level {
        tracing_subscriber::EnvFilter::new(level.clone())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(config.general.log_level.clone())
        })
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Cliniq v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    if let Some(backend) = args.model_backend {
        config.llm.backend = backend;
    }

    let patient_id = args
        .patient_id
        .unwrap_or_else(|| config.chat.default_patient_id.clone());
    let thread_id = args
        .thread_id
        .unwrap_or_else(|| config.chat.default_thread_id.clone());

    // Model. A missing OPENAI_API_KEY surfaces here as a startup error.
    let model = match create_chat_model(&config.llm) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(backend = %config.llm.backend, error = %e, "Failed to build chat model");
            return Err(e.into());
        }
    };
    tracing::info!(backend = %config.llm.backend, model = %model.name(), "Chat model ready");

    // Store and assistant.
    let store = Arc::new(InMemoryStore::new());
    let assistant = CareAssistant::new(&config, model, Arc::clone(&store));
    tracing::info!(patient_id = %patient_id, thread_id = %thread_id, "Assistant ready");

    // === Interactive loop ===

    println!(
        "{} assistant. Type a message; /profile shows the stored patient profile; /quit exits.",
        config.clinic.name
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(l) => l,
            None => break, // EOF
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/profile" => match assistant.profile(&patient_id)? {
                Some(profile) => println!("{}", profile),
                None => println!("No profile stored yet."),
            },
            _ => match assistant.handle_message(&thread_id, &patient_id, input).await {
                Ok(reply) => println!("{}", reply.text),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to handle message");
                    eprintln!("error: {}", e);
                }
            },
        }
    }

    println!("Goodbye.");
    Ok(())
}
