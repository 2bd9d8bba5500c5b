// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Parley - persistent LLM conversations from your terminal
//!
//! Entry point for the Parley CLI application.

use std::io::Read;
use std::sync::Arc;

use clap::Parser;

use parley::cli::Cli;
use parley::config::Settings;
use parley::documents::{self, DocumentStore, NoopDocumentStore};
use parley::error::{ParleyError, Result};
use parley::functions::builtin;
use parley::llm::openai::OpenAiTransport;
use parley::session::Session;
use parley::tokenizer::HeuristicTokenizer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr; -v raises the level
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let env_filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load()?;

    let api_key = std::env::var(&settings.api.api_key_env).unwrap_or_default();
    let model = cli
        .model
        .clone()
        .unwrap_or_else(|| settings.api.default_model.clone());
    let transport = Arc::new(OpenAiTransport::with_base_url(
        api_key.clone(),
        model,
        settings.api.base_url.clone(),
    ));

    let document_store: Arc<dyn DocumentStore> = if settings.documents.enabled {
        documents::open_or_noop(&settings.documents_path())
    } else {
        Arc::new(NoopDocumentStore)
    };

    let mut session = Session::builder()
        .with_conversation(&cli.conversation)
        .with_history_dir(Settings::history_path())
        .with_transport(transport)
        .with_functions(builtin::default_registry(document_store))
        .with_tokenizer(Box::new(HeuristicTokenizer::new(
            settings.conversation.chars_per_token,
        )))
        .with_max_token_count(cli.threshold.unwrap_or(settings.conversation.max_token_count))
        .with_max_function_rounds(settings.conversation.max_function_rounds)
        .disable_functions(cli.disable_functions)
        .build()?;

    if cli.retrieve_last {
        if let Some(message) = session.last_message()? {
            println!("{}", message);
        }
        return Ok(());
    }

    if cli.token_count {
        println!("{}", session.token_count()?);
        return Ok(());
    }

    if api_key.is_empty() {
        return Err(ParleyError::Config(format!(
            "no API key: set {}",
            settings.api.api_key_env
        )));
    }

    let message = read_message(&cli)?;
    let reply = session.send_user_message(message).await?;
    println!("{}", reply);

    Ok(())
}

/// Get the outgoing message from stdin or the positional argument
fn read_message(cli: &Cli) -> Result<String> {
    if cli.stdin {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer.trim().to_string());
    }

    cli.message
        .clone()
        .ok_or_else(|| ParleyError::InvalidInput("must give message via stdin or argument".into()))
}
