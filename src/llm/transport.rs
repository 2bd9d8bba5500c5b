// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat transport abstraction
//!
//! One call in, one reply out. The reply is classified here, at the
//! boundary, into an explicit variant; nothing downstream re-inspects the
//! wire shape.

use async_trait::async_trait;

use crate::error::Result;
use crate::functions::FunctionSchema;
use crate::llm::message::{FunctionCall, MessageRecord};

/// One classified reply from the remote model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportReply {
    /// Plain text content; terminal for a turn
    Content(String),

    /// Request to invoke a host-side function; must be resolved
    FunctionCall(FunctionCall),
}

impl TransportReply {
    /// Check if this reply is a function call
    pub fn is_function_call(&self) -> bool {
        matches!(self, TransportReply::FunctionCall(_))
    }
}

/// Trait for sending a conversation to the remote model
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the serialized conversation (and the function schemas the model
    /// may call, unless functions are disabled) and receive one reply.
    async fn send(
        &self,
        payload: &[MessageRecord],
        functions: Option<&[FunctionSchema]>,
    ) -> Result<TransportReply>;
}
