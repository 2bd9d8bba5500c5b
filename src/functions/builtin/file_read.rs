// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! File read function
//!
//! Returns a file's contents to the model, or a descriptive string it can
//! act on when the path is wrong.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::functions::{required_str, FunctionArgs, HostFunction};

use super::expand_tilde;

/// Read the contents of a file
pub struct GetFileContentsFunction;

impl HostFunction for GetFileContentsFunction {
    fn name(&self) -> &str {
        "get_file_contents"
    }

    fn description(&self) -> &str {
        "Get the contents of a file"
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
        props
    }

    fn required(&self) -> Vec<&str> {
        vec!["path"]
    }

    fn invoke(&self, args: &FunctionArgs) -> Result<String> {
        let path = expand_tilde(required_str(args, "path")?);

        if path.is_dir() {
            return Ok("That is a directory, not a file.  Try again with a valid path.".to_string());
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok("That file does not exist.  Try again with a valid path.".to_string())
            }
            Err(e) => Ok(format!("Failed to read file: {}", e)),
        }
    }
}
