// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! File write function
//!
//! Overwrites a file with the contents the model supplies.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::functions::{required_str, FunctionArgs, HostFunction};

use super::expand_tilde;

/// Overwrite a file's contents
pub struct SetFileContentsFunction;

impl HostFunction for SetFileContentsFunction {
    fn name(&self) -> &str {
        "set_file_contents"
    }

    fn description(&self) -> &str {
        "Set the contents of a file"
    }

    fn parameters(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(
            "path".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "The path to the file"
            }),
        );
        props.insert(
            "contents".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "The contents to write to the file"
            }),
        );
        props
    }

    fn required(&self) -> Vec<&str> {
        vec!["path", "contents"]
    }

    fn invoke(&self, args: &FunctionArgs) -> Result<String> {
        let path = expand_tilde(required_str(args, "path")?);
        let contents = required_str(args, "contents")?;

        match std::fs::write(&path, contents) {
            Ok(()) => Ok("File contents written successfully".to_string()),
            Err(e) => Ok(format!("Failed to write file: {}", e)),
        }
    }
}
