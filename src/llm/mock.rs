// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock chat transport for testing
//!
//! A scriptable implementation of [`ChatTransport`] that replays queued
//! replies, counts calls, and records every payload it was sent, so tests
//! never touch the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::functions::FunctionSchema;
use crate::llm::message::{FunctionCall, MessageRecord};
use crate::llm::transport::{ChatTransport, TransportReply};

/// A scriptable transport that never calls the network
pub struct MockTransport {
    replies: Mutex<Vec<TransportReply>>,
    call_count: AtomicUsize,
    recorded_payloads: Mutex<Vec<Vec<MessageRecord>>>,
    recorded_function_counts: Mutex<Vec<Option<usize>>>,
}

impl MockTransport {
    /// Create a mock that always replies with fixed text
    pub fn new(reply: impl Into<String>) -> Self {
        Self::with_replies(vec![TransportReply::Content(reply.into())])
    }

    /// Create a mock that replays `replies` in order, repeating the last one
    /// once exhausted
    pub fn with_replies(replies: Vec<TransportReply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            call_count: AtomicUsize::new(0),
            recorded_payloads: Mutex::new(Vec::new()),
            recorded_function_counts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that replies with one function call, then fixed text
    pub fn with_function_call_then(
        name: impl Into<String>,
        arguments: impl Into<String>,
        then: impl Into<String>,
    ) -> Self {
        Self::with_replies(vec![
            TransportReply::FunctionCall(FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            }),
            TransportReply::Content(then.into()),
        ])
    }

    /// Number of times `send` was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every payload sent, in call order
    pub fn recorded_payloads(&self) -> Vec<Vec<MessageRecord>> {
        self.recorded_payloads.lock().unwrap().clone()
    }

    /// The payload of the most recent call
    pub fn last_payload(&self) -> Option<Vec<MessageRecord>> {
        self.recorded_payloads.lock().unwrap().last().cloned()
    }

    /// How many function schemas each call advertised (`None` = disabled)
    pub fn recorded_function_counts(&self) -> Vec<Option<usize>> {
        self.recorded_function_counts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(
        &self,
        payload: &[MessageRecord],
        functions: Option<&[FunctionSchema]>,
    ) -> Result<TransportReply> {
        let index = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.recorded_payloads.lock().unwrap().push(payload.to_vec());
        self.recorded_function_counts
            .lock()
            .unwrap()
            .push(functions.map(|f| f.len()));

        let replies = self.replies.lock().unwrap();
        let reply = replies
            .get(index.min(replies.len().saturating_sub(1)))
            .cloned()
            .unwrap_or_else(|| TransportReply::Content(String::new()));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::Message;

    #[tokio::test]
    async fn test_replays_in_order_then_repeats_last() {
        let mock = MockTransport::with_replies(vec![
            TransportReply::Content("first".to_string()),
            TransportReply::Content("second".to_string()),
        ]);

        let payload = vec![Message::user("hi").to_record()];
        assert_eq!(
            mock.send(&payload, None).await.unwrap(),
            TransportReply::Content("first".to_string())
        );
        assert_eq!(
            mock.send(&payload, None).await.unwrap(),
            TransportReply::Content("second".to_string())
        );
        assert_eq!(
            mock.send(&payload, None).await.unwrap(),
            TransportReply::Content("second".to_string())
        );
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_records_payloads_and_function_counts() {
        let mock = MockTransport::new("ok");
        let payload = vec![
            Message::system("prompt").to_record(),
            Message::user("hi").to_record(),
        ];

        mock.send(&payload, Some(&[])).await.unwrap();

        assert_eq!(mock.recorded_payloads().len(), 1);
        assert_eq!(mock.last_payload().unwrap().len(), 2);
        assert_eq!(mock.recorded_function_counts(), vec![Some(0)]);
    }
}
