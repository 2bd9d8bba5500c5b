// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Message types for LLM conversations
//!
//! Defines the message variants that can appear in a conversation and their
//! wire/storage serialization.

use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

/// A request by the model to invoke a host-side function.
///
/// `arguments` is a JSON-encoded string, exactly as the API delivers it; it
/// is not parsed until dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function to invoke
    pub name: String,

    /// JSON-encoded argument object
    pub arguments: String,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The fixed instruction prompt; prepended at transport time, never
    /// persisted as part of history
    System(String),

    /// Caller-authored turn input
    User(String),

    /// Model-authored plain reply; terminal for a turn
    Assistant(String),

    /// Model-authored request to invoke a function; non-terminal
    FunctionCall(FunctionCall),

    /// Host-authored output of a dispatched function, fed back to the model
    FunctionResult { name: String, content: String },
}

/// Serialized form of a [`Message`], as stored on disk and sent on the wire.
///
/// Role tags follow the chat-completions convention: `system`, `user`,
/// `assistant`, and `function` for both call and result records. For the
/// `function` role the populated field, not the tag, decides the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Role tag
    pub role: String,

    /// Text content, present for every variant except a function call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Function name, present on function-result records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Requested call, present on function-call records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Message::User(content.into())
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant(content.into())
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    /// Create a function-result message
    pub fn function_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Message::FunctionResult {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The role tag used for serialization
    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
            Message::FunctionCall(_) | Message::FunctionResult { .. } => "function",
        }
    }

    /// The text content this message carries, if any.
    ///
    /// Function calls carry no content and return `None`.
    pub fn content(&self) -> Option<&str> {
        match self {
            Message::System(text)
            | Message::User(text)
            | Message::Assistant(text)
            | Message::FunctionResult { content: text, .. } => Some(text),
            Message::FunctionCall(_) => None,
        }
    }

    /// Convert to the serialized record form
    pub fn to_record(&self) -> MessageRecord {
        match self {
            Message::System(text) | Message::User(text) | Message::Assistant(text) => {
                MessageRecord {
                    role: self.role().to_string(),
                    content: Some(text.clone()),
                    name: None,
                    function_call: None,
                }
            }
            Message::FunctionCall(call) => MessageRecord {
                role: "function".to_string(),
                content: None,
                name: None,
                function_call: Some(call.clone()),
            },
            Message::FunctionResult { name, content } => MessageRecord {
                role: "function".to_string(),
                content: Some(content.clone()),
                name: Some(name.clone()),
                function_call: None,
            },
        }
    }
}

impl TryFrom<MessageRecord> for Message {
    type Error = ParleyError;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        match record.role.as_str() {
            "system" => Ok(Message::System(record.content.unwrap_or_default())),
            "user" => Ok(Message::User(record.content.unwrap_or_default())),
            "assistant" => Ok(Message::Assistant(record.content.unwrap_or_default())),
            "function" => {
                // The populated field decides: a record with content is a
                // result, one with function_call is a call.
                if let Some(content) = record.content {
                    Ok(Message::FunctionResult {
                        name: record.name.unwrap_or_default(),
                        content,
                    })
                } else if let Some(call) = record.function_call {
                    Ok(Message::FunctionCall(call))
                } else {
                    Err(ParleyError::UnknownRole(
                        "function record with neither content nor function_call".to_string(),
                    ))
                }
            }
            other => Err(ParleyError::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::FunctionCall(call) => write!(f, "[function call: {}]", call.name),
            other => write!(f, "{}", other.content().unwrap_or_default()),
        }
    }
}
