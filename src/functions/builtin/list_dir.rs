// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Directory listing function

use serde_json::{Map, Value};

use crate::error::Result;
use crate::functions::{required_str, FunctionArgs, HostFunction};

use super::expand_tilde;

/// List the entries of a directory, one name per line
pub struct ListDirectoryFunction;

impl HostFunction for ListDirectoryFunction {
    fn name(&self) -> &str {
        "list_directory_files"
    }

    fn description(&self) -> &str {
        "List the files in a directory"
    }

    fn parameters(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(
            "path".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "The path to the directory"
            }),
        );
        props
    }

    fn required(&self) -> Vec<&str> {
        vec!["path"]
    }

    fn invoke(&self, args: &FunctionArgs) -> Result<String> {
        let path = expand_tilde(required_str(args, "path")?);

        let entries = match std::fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(
                    "That directory does not exist.  Try again with a valid path.".to_string(),
                );
            }
            Err(e) => return Ok(format!("Failed to list directory: {}", e)),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();

        Ok(names.join("\n"))
    }
}
