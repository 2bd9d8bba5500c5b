// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Integration tests for the session turn-resolution loop
//!
//! Exercises the full path from caller input to persisted history against a
//! scripted transport, without touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tempfile::TempDir;

use parley::error::ParleyError;
use parley::functions::{FunctionArgs, FunctionRegistry, HostFunction};
use parley::llm::message::{FunctionCall, Message};
use parley::llm::mock::MockTransport;
use parley::llm::transport::TransportReply;
use parley::session::Session;

/// Test function that counts its dispatches and echoes its argument
struct CountingFunction {
    dispatches: Arc<AtomicUsize>,
}

impl HostFunction for CountingFunction {
    fn name(&self) -> &str {
        "lookup"
    }

    fn description(&self) -> &str {
        "Look something up"
    }

    fn parameters(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(
            "query".to_string(),
            serde_json::json!({"type": "string", "description": "What to look up"}),
        );
        props
    }

    fn required(&self) -> Vec<&str> {
        vec!["query"]
    }

    fn invoke(&self, args: &FunctionArgs) -> parley::Result<String> {
        self.dispatches.fetch_add(1, Ordering::SeqCst);
        let query = args.get("query").and_then(Value::as_str).unwrap_or("");
        Ok(format!("result for {}", query))
    }
}

fn registry_with_counter() -> (FunctionRegistry, Arc<AtomicUsize>) {
    let dispatches = Arc::new(AtomicUsize::new(0));
    let mut registry = FunctionRegistry::new();
    registry.register(Arc::new(CountingFunction {
        dispatches: dispatches.clone(),
    }));
    (registry, dispatches)
}

fn session_in(
    temp_dir: &TempDir,
    transport: Arc<MockTransport>,
    functions: FunctionRegistry,
) -> Session {
    Session::builder()
        .with_conversation("itest")
        .with_system_prompt("be helpful")
        .with_history_dir(temp_dir.path().to_path_buf())
        .with_transport(transport)
        .with_functions(functions)
        .build()
        .unwrap()
}

#[tokio::test]
async fn turn_terminates_after_one_transport_call() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::new("hello"));
    let mut session = session_in(&temp_dir, transport.clone(), FunctionRegistry::new());

    let reply = session.send_user_message("hi").await.unwrap();

    assert_eq!(reply, Message::assistant("hello"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn tool_loop_dispatches_once_and_persists_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::with_function_call_then(
        "lookup",
        r#"{"query": "weather"}"#,
        "sunny",
    ));
    let (registry, dispatches) = registry_with_counter();
    let mut session = session_in(&temp_dir, transport.clone(), registry);

    let reply = session.send_user_message("what's the weather?").await.unwrap();

    assert_eq!(reply, Message::assistant("sunny"));
    assert_eq!(transport.call_count(), 2);
    assert_eq!(dispatches.load(Ordering::SeqCst), 1);

    // The persisted record holds, in order: the user message, the function
    // result, the assistant reply. The function call itself is not stored.
    let content = std::fs::read_to_string(temp_dir.path().join("itest.json")).unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["role"], "user");
    assert_eq!(records[0]["content"], "what's the weather?");
    assert_eq!(records[1]["role"], "function");
    assert_eq!(records[1]["name"], "lookup");
    assert_eq!(records[1]["content"], "result for weather");
    assert_eq!(records[2]["role"], "assistant");
    assert_eq!(records[2]["content"], "sunny");
}

#[tokio::test]
async fn function_result_is_fed_back_to_transport() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::with_function_call_then(
        "lookup",
        r#"{"query": "x"}"#,
        "done",
    ));
    let (registry, _) = registry_with_counter();
    let mut session = session_in(&temp_dir, transport.clone(), registry);

    session.send_user_message("go").await.unwrap();

    // The second payload must contain the function result record.
    let payloads = transport.recorded_payloads();
    assert_eq!(payloads.len(), 2);
    let second = &payloads[1];
    assert!(second
        .iter()
        .any(|r| r.role == "function" && r.content.as_deref() == Some("result for x")));
}

#[tokio::test]
async fn unbounded_function_calls_fail_with_tool_loop_exceeded() {
    let temp_dir = TempDir::new().unwrap();
    // A single queued function-call reply repeats forever.
    let transport = Arc::new(MockTransport::with_replies(vec![
        TransportReply::FunctionCall(FunctionCall {
            name: "lookup".to_string(),
            arguments: r#"{"query": "again"}"#.to_string(),
        }),
    ]));
    let (registry, dispatches) = registry_with_counter();
    let mut session = Session::builder()
        .with_conversation("itest")
        .with_history_dir(temp_dir.path().to_path_buf())
        .with_transport(transport)
        .with_functions(registry)
        .with_max_function_rounds(3)
        .build()
        .unwrap();

    let err = session.send_user_message("go").await.unwrap_err();
    assert!(matches!(err, ParleyError::ToolLoopExceeded(3)));
    assert_eq!(dispatches.load(Ordering::SeqCst), 3);

    // An aborted turn persists nothing.
    assert!(!temp_dir.path().join("itest.json").exists());
}

#[tokio::test]
async fn unknown_function_aborts_the_turn() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::with_function_call_then(
        "not_registered",
        "{}",
        "unreachable",
    ));
    let mut session = session_in(&temp_dir, transport.clone(), FunctionRegistry::new());

    let err = session.send_user_message("go").await.unwrap_err();
    assert!(matches!(err, ParleyError::UnknownFunction(name) if name == "not_registered"));
    assert_eq!(transport.call_count(), 1);
    assert!(!temp_dir.path().join("itest.json").exists());
}

#[tokio::test]
async fn malformed_arguments_abort_the_turn() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::with_function_call_then(
        "lookup",
        "{broken json",
        "unreachable",
    ));
    let (registry, dispatches) = registry_with_counter();
    let mut session = session_in(&temp_dir, transport, registry);

    let err = session.send_user_message("go").await.unwrap_err();
    assert!(matches!(err, ParleyError::MalformedArguments(_)));
    assert_eq!(dispatches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn conversation_persists_across_sessions() {
    let temp_dir = TempDir::new().unwrap();
    {
        let transport = Arc::new(MockTransport::new("first answer"));
        let mut session = session_in(&temp_dir, transport, FunctionRegistry::new());
        session.send_user_message("first question").await.unwrap();
    }

    // A new session over the same conversation name sees the prior turn and
    // sends it along with the new input.
    let transport = Arc::new(MockTransport::new("second answer"));
    let mut session = session_in(&temp_dir, transport.clone(), FunctionRegistry::new());
    session.send_user_message("second question").await.unwrap();

    let payload = transport.last_payload().unwrap();
    let roles: Vec<&str> = payload.iter().map(|r| r.role.as_str()).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert_eq!(payload[1].content.as_deref(), Some("first question"));
    assert_eq!(payload[3].content.as_deref(), Some("second question"));
}

#[tokio::test]
async fn retrieval_accessors_read_persisted_state() {
    let temp_dir = TempDir::new().unwrap();
    {
        let transport = Arc::new(MockTransport::new("the answer"));
        let mut session = session_in(&temp_dir, transport, FunctionRegistry::new());
        session.send_user_message("the question").await.unwrap();
    }

    let transport = Arc::new(MockTransport::new("unused"));
    let mut session = session_in(&temp_dir, transport.clone(), FunctionRegistry::new());

    assert_eq!(
        session.last_message().unwrap(),
        Some(&Message::assistant("the answer"))
    );
    assert!(session.token_count().unwrap() > 0);
    // Retrieval modes never call the transport.
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn schemas_are_advertised_unless_disabled() {
    let temp_dir = TempDir::new().unwrap();
    let (registry, _) = registry_with_counter();
    let transport = Arc::new(MockTransport::new("ok"));
    let mut session = session_in(&temp_dir, transport.clone(), registry);

    session.send_user_message("hi").await.unwrap();
    assert_eq!(transport.recorded_function_counts(), vec![Some(1)]);

    let temp_dir = TempDir::new().unwrap();
    let (registry, _) = registry_with_counter();
    let transport = Arc::new(MockTransport::new("ok"));
    let mut session = Session::builder()
        .with_conversation("itest")
        .with_history_dir(temp_dir.path().to_path_buf())
        .with_transport(transport.clone())
        .with_functions(registry)
        .disable_functions(true)
        .build()
        .unwrap();

    session.send_user_message("hi").await.unwrap();
    assert_eq!(transport.recorded_function_counts(), vec![None]);
}

#[tokio::test]
async fn oversized_input_is_truncated_before_send() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::new("ok"));
    let mut session = Session::builder()
        .with_conversation("itest")
        .with_system_prompt("sys")
        .with_history_dir(temp_dir.path().to_path_buf())
        .with_transport(transport.clone())
        .with_max_token_count(2)
        .build()
        .unwrap();

    // Way over a 2-token budget; unconditional FIFO eviction empties the
    // log, so only the system prompt goes out.
    session
        .send_user_message("a message far larger than the whole budget")
        .await
        .unwrap();

    let payload = &transport.recorded_payloads()[0];
    let roles: Vec<&str> = payload.iter().map(|r| r.role.as_str()).collect();
    assert_eq!(roles, vec!["system"]);
}
