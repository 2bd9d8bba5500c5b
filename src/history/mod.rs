// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat history store
//!
//! An ordered, persisted log of messages for one named conversation. The
//! persisted record is a JSON array of serialized messages, one file per
//! conversation name; the system prompt lives beside the log and is prepended
//! only at transport time, never stored or counted.
//!
//! Single writer per conversation name is a hard precondition: concurrent
//! processes racing on the same record get last-writer-wins with no locking.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{ParleyError, Result};
use crate::llm::message::{Message, MessageRecord};
use crate::tokenizer::Tokenizer;

/// Ordered message log for one named conversation
pub struct ChatHistory {
    conversation_name: String,
    file_path: PathBuf,
    system_prompt: Message,
    messages: Vec<Message>,
}

impl ChatHistory {
    /// Create a history for `conversation_name`, persisted under
    /// `history_dir`. The log starts empty; call [`load`](Self::load) to
    /// populate it from disk.
    pub fn new(
        conversation_name: impl Into<String>,
        system_prompt: impl Into<String>,
        history_dir: PathBuf,
    ) -> Self {
        let conversation_name = conversation_name.into();
        let file_path = history_dir.join(format!("{}.json", conversation_name));
        Self {
            conversation_name,
            file_path,
            system_prompt: Message::system(system_prompt),
            messages: Vec::new(),
        }
    }

    /// The conversation name this history belongs to
    pub fn conversation_name(&self) -> &str {
        &self.conversation_name
    }

    /// The stored messages, in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last stored message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Add a message to the tail of the log
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Total token count over all stored messages.
    ///
    /// Function-call messages carry no content and contribute zero. The
    /// system prompt is not stored and not counted.
    pub fn token_count(&self, tokenizer: &dyn Tokenizer) -> usize {
        self.messages
            .iter()
            .filter_map(Message::content)
            .map(|text| tokenizer.count_tokens(text))
            .sum()
    }

    /// Evict oldest messages until the total token count fits `budget`.
    ///
    /// Eviction is unconditional FIFO: a single message larger than the
    /// budget can empty the log entirely, newest input included.
    pub fn truncate(&mut self, budget: usize, tokenizer: &dyn Tokenizer) {
        let mut total = self.token_count(tokenizer);
        let mut evicted = 0usize;
        while total > budget && !self.messages.is_empty() {
            let oldest = self.messages.remove(0);
            total -= oldest.content().map_or(0, |t| tokenizer.count_tokens(t));
            evicted += 1;
        }
        if evicted > 0 {
            debug!(
                conversation = %self.conversation_name,
                evicted, remaining = self.messages.len(),
                "truncated history to token budget"
            );
        }
    }

    /// Populate the log from the persisted record.
    ///
    /// Load-once: a non-empty in-memory log is the source of truth and the
    /// call returns without touching disk. A missing record is an empty
    /// conversation, not an error.
    pub fn load(&mut self) -> Result<&[Message]> {
        if !self.messages.is_empty() {
            return Ok(&self.messages);
        }

        if !self.file_path.exists() {
            return Ok(&self.messages);
        }

        let content = std::fs::read_to_string(&self.file_path).map_err(|e| {
            ParleyError::Persistence(format!(
                "failed to read {}: {}",
                self.file_path.display(),
                e
            ))
        })?;
        let records: Vec<MessageRecord> = serde_json::from_str(&content).map_err(|e| {
            ParleyError::Persistence(format!(
                "failed to parse {}: {}",
                self.file_path.display(),
                e
            ))
        })?;

        self.messages = records
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            conversation = %self.conversation_name,
            messages = self.messages.len(),
            "loaded history"
        );
        Ok(&self.messages)
    }

    /// Persist the full log, overwriting any prior record.
    ///
    /// The system prompt is excluded. The record is written to a temp file
    /// and renamed into place so a failed write never leaves a truncated
    /// array behind.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ParleyError::Persistence(format!(
                    "failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let records: Vec<MessageRecord> = self.messages.iter().map(Message::to_record).collect();
        let content = serde_json::to_string(&records)
            .map_err(|e| ParleyError::Persistence(format!("failed to serialize history: {}", e)))?;

        let tmp_path = self.file_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content).map_err(|e| {
            ParleyError::Persistence(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        std::fs::rename(&tmp_path, &self.file_path).map_err(|e| {
            ParleyError::Persistence(format!(
                "failed to rename into {}: {}",
                self.file_path.display(),
                e
            ))
        })?;

        debug!(
            conversation = %self.conversation_name,
            messages = self.messages.len(),
            "saved history"
        );
        Ok(())
    }

    /// The serialized sequence sent to the transport: the system prompt
    /// first, then every stored message in order.
    pub fn transport_payload(&self) -> Vec<MessageRecord> {
        std::iter::once(self.system_prompt.to_record())
            .chain(self.messages.iter().map(Message::to_record))
            .collect()
    }
}
