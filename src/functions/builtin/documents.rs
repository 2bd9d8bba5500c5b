// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Note-document functions
//!
//! `create_document` and `search_documents` delegate to the document store;
//! when the store is the degraded no-op these quietly do nothing useful, but
//! they never fail the turn.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::documents::DocumentStore;
use crate::error::Result;
use crate::functions::{required_str, FunctionArgs, HostFunction};

/// Save a note document
pub struct CreateDocumentFunction {
    store: Arc<dyn DocumentStore>,
}

impl CreateDocumentFunction {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl HostFunction for CreateDocumentFunction {
    fn name(&self) -> &str {
        "create_document"
    }

    fn description(&self) -> &str {
        "Create a document"
    }

    fn parameters(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(
            "text".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "The text to save"
            }),
        );
        props
    }

    fn required(&self) -> Vec<&str> {
        vec!["text"]
    }

    fn invoke(&self, args: &FunctionArgs) -> Result<String> {
        let text = required_str(args, "text")?;
        match self.store.save(text) {
            Ok(()) => Ok("Document created successfully".to_string()),
            Err(e) => Ok(format!("Failed to create document: {}", e)),
        }
    }
}

/// Search note documents by similarity
pub struct SearchDocumentsFunction {
    store: Arc<dyn DocumentStore>,
}

impl SearchDocumentsFunction {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl HostFunction for SearchDocumentsFunction {
    fn name(&self) -> &str {
        "search_documents"
    }

    fn description(&self) -> &str {
        "Search for documents"
    }

    fn parameters(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(
            "text".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "The text to search for"
            }),
        );
        props
    }

    fn required(&self) -> Vec<&str> {
        vec!["text"]
    }

    fn invoke(&self, args: &FunctionArgs) -> Result<String> {
        let text = required_str(args, "text")?;
        match self.store.search(text) {
            Ok(summary) => Ok(summary),
            Err(e) => Ok(format!("Failed to search documents: {}", e)),
        }
    }
}
