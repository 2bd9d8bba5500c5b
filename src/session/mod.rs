// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Session orchestration
//!
//! Drives one logical turn: append the caller's message, enforce the token
//! budget, call the transport, classify the reply, and keep dispatching
//! function calls until the model produces a plain content reply. The
//! session exclusively owns its history and registry; nothing here is a
//! process-wide singleton.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::error::{ParleyError, Result};
use crate::functions::FunctionRegistry;
use crate::history::ChatHistory;
use crate::llm::message::Message;
use crate::llm::transport::{ChatTransport, TransportReply};
use crate::prompts;
use crate::tokenizer::{HeuristicTokenizer, Tokenizer};

/// A persistent conversation session against one transport
pub struct Session {
    history: ChatHistory,
    functions: FunctionRegistry,
    transport: Arc<dyn ChatTransport>,
    tokenizer: Box<dyn Tokenizer>,
    max_token_count: usize,
    max_function_rounds: usize,
    disable_functions: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("max_token_count", &self.max_token_count)
            .field("max_function_rounds", &self.max_function_rounds)
            .field("disable_functions", &self.disable_functions)
            .finish_non_exhaustive()
    }
}

/// Builder for creating [`Session`] instances
pub struct SessionBuilder {
    conversation_name: String,
    system_prompt: String,
    history_dir: PathBuf,
    transport: Option<Arc<dyn ChatTransport>>,
    functions: FunctionRegistry,
    tokenizer: Box<dyn Tokenizer>,
    max_token_count: usize,
    max_function_rounds: usize,
    disable_functions: bool,
}

impl SessionBuilder {
    /// Create a builder with default conversation state
    pub fn new() -> Self {
        let defaults = Settings::default();
        Self {
            conversation_name: "default".to_string(),
            system_prompt: prompts::DEFAULT.to_string(),
            history_dir: Settings::history_path(),
            transport: None,
            functions: FunctionRegistry::new(),
            tokenizer: Box::new(HeuristicTokenizer::default()),
            max_token_count: defaults.conversation.max_token_count,
            max_function_rounds: defaults.conversation.max_function_rounds,
            disable_functions: false,
        }
    }

    /// Set the conversation name (decides the persisted record)
    pub fn with_conversation(mut self, name: impl Into<String>) -> Self {
        self.conversation_name = name.into();
        self
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the directory holding persisted conversation records
    pub fn with_history_dir(mut self, dir: PathBuf) -> Self {
        self.history_dir = dir;
        self
    }

    /// Set the transport
    pub fn with_transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the function registry the session owns
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// Set the tokenizer used for budget accounting
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Set the conversation token budget
    pub fn with_max_token_count(mut self, max_token_count: usize) -> Self {
        self.max_token_count = max_token_count;
        self
    }

    /// Set the function-call round limit per turn
    pub fn with_max_function_rounds(mut self, rounds: usize) -> Self {
        self.max_function_rounds = rounds;
        self
    }

    /// Disable function advertising and dispatch for this session
    pub fn disable_functions(mut self, disable: bool) -> Self {
        self.disable_functions = disable;
        self
    }

    /// Build the session
    pub fn build(self) -> Result<Session> {
        let transport = self
            .transport
            .ok_or_else(|| ParleyError::Config("no transport set".into()))?;

        Ok(Session {
            history: ChatHistory::new(
                self.conversation_name,
                self.system_prompt,
                self.history_dir,
            ),
            functions: self.functions,
            transport,
            tokenizer: self.tokenizer,
            max_token_count: self.max_token_count,
            max_function_rounds: self.max_function_rounds,
            disable_functions: self.disable_functions,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Resolve one turn: feed `input` to the model and keep dispatching
    /// function calls until it answers with plain content.
    ///
    /// The content reply is appended, the conversation persisted, and the
    /// reply returned. Function-call rounds beyond the configured limit fail
    /// with [`ParleyError::ToolLoopExceeded`]; any transport or dispatch
    /// failure aborts the turn without saving.
    pub async fn resolve(&mut self, input: Message) -> Result<Message> {
        let mut next = input;
        let mut rounds = 0usize;

        loop {
            self.history.load()?;
            self.history.append(next);
            self.history
                .truncate(self.max_token_count, self.tokenizer.as_ref());

            let schemas = if self.disable_functions {
                None
            } else {
                Some(self.functions.schemas())
            };
            let reply = self
                .transport
                .send(&self.history.transport_payload(), schemas.as_deref())
                .await?;

            match reply {
                TransportReply::Content(text) => {
                    let message = Message::assistant(text);
                    self.history.append(message.clone());
                    self.history.save()?;
                    return Ok(message);
                }
                TransportReply::FunctionCall(call) => {
                    rounds += 1;
                    if rounds > self.max_function_rounds {
                        return Err(ParleyError::ToolLoopExceeded(self.max_function_rounds));
                    }
                    debug!(function = %call.name, round = rounds, "model requested function call");

                    let output = self.functions.dispatch(&call.name, &call.arguments)?;
                    // The function result becomes the next input message.
                    next = Message::function_result(call.name, output);
                }
            }
        }
    }

    /// Resolve one turn starting from caller-authored text
    pub async fn send_user_message(&mut self, text: impl Into<String>) -> Result<Message> {
        self.resolve(Message::user(text)).await
    }

    /// Load the conversation and return its last message, if any
    pub fn last_message(&mut self) -> Result<Option<&Message>> {
        self.history.load()?;
        Ok(self.history.last())
    }

    /// Load the conversation and return its current token count
    pub fn token_count(&mut self) -> Result<usize> {
        self.history.load()?;
        Ok(self.history.token_count(self.tokenizer.as_ref()))
    }

    /// The chat history this session owns
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// The function registry this session owns
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}
