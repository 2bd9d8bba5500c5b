// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Shell command function
//!
//! Runs a shell command the model asked for, after the user confirms it on
//! the terminal. A declined command resolves to a descriptive string the
//! model sees, never an error.

use std::io::Write;
use std::process::Command;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::functions::{required_str, FunctionArgs, HostFunction};

/// Callback asked to approve a command before it runs
pub type ShellConfirmer = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Execute an interactively-confirmed shell command
pub struct ExecuteShellCommandFunction {
    confirm: ShellConfirmer,
}

impl ExecuteShellCommandFunction {
    /// Create with the default stdin y/n confirmation prompt
    pub fn new() -> Self {
        Self {
            confirm: Box::new(confirm_on_stdin),
        }
    }

    /// Create with a custom confirmer, for tests and embedding
    pub fn with_confirmer(confirm: ShellConfirmer) -> Self {
        Self { confirm }
    }
}

impl Default for ExecuteShellCommandFunction {
    fn default() -> Self {
        Self::new()
    }
}

/// Prompt on the terminal and read a y/n answer from stdin
fn confirm_on_stdin(command: &str) -> bool {
    println!("executing shell command: {}", command);
    print!("execute shell command? (y/n) ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim() == "y"
}

impl HostFunction for ExecuteShellCommandFunction {
    fn name(&self) -> &str {
        "execute_shell_command"
    }

    fn description(&self) -> &str {
        "Executes a shell command and returns the output"
    }

    fn parameters(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(
            "command".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "The command to execute"
            }),
        );
        props
    }

    fn required(&self) -> Vec<&str> {
        vec!["command"]
    }

    fn invoke(&self, args: &FunctionArgs) -> Result<String> {
        let command = required_str(args, "command")?;

        if !(self.confirm)(command) {
            return Ok(
                "The user with which you are chatting has declined to execute this command"
                    .to_string(),
            );
        }

        debug!(command, "executing shell command");
        match Command::new("sh").arg("-c").arg(command).output() {
            Ok(output) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
            Err(e) => Ok(format!("Failed to execute command: {}", e)),
        }
    }
}
