// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Built-in host functions
//!
//! The default tool set the model may call: file access, directory listing,
//! confirmed shell execution, and note documents. Every tool converts its own
//! failures (missing file, declined command) into a descriptive result string
//! for the model; only dispatcher-level failures are hard errors.

mod documents;
mod file_read;
mod file_write;
mod list_dir;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

pub use documents::{CreateDocumentFunction, SearchDocumentsFunction};
pub use file_read::GetFileContentsFunction;
pub use file_write::SetFileContentsFunction;
pub use list_dir::ListDirectoryFunction;
pub use shell::{ExecuteShellCommandFunction, ShellConfirmer};

use super::FunctionRegistry;
use crate::documents::DocumentStore;

/// Build a registry with the default tool set, in the order the model is
/// told about them.
pub fn default_registry(documents: Arc<dyn DocumentStore>) -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry.register(Arc::new(GetFileContentsFunction));
    registry.register(Arc::new(SetFileContentsFunction));
    registry.register(Arc::new(ListDirectoryFunction));
    registry.register(Arc::new(ExecuteShellCommandFunction::new()));
    registry.register(Arc::new(CreateDocumentFunction::new(documents.clone())));
    registry.register(Arc::new(SearchDocumentsFunction::new(documents)));
    registry
}

/// Expand a leading `~` to the user's home directory
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.strip_prefix('/').unwrap_or(rest);
            if rest.is_empty() {
                return home;
            }
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
