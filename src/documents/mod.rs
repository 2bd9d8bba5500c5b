// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Note-document persistence and similarity search
//!
//! Backs the `create_document`/`search_documents` functions. The store is a
//! narrow interface so the dispatch layer never sees the database: save text,
//! search text, get a ranked textual summary back. When the backing database
//! cannot be opened the store degrades to an inert no-op instead of failing
//! the turn.

mod embedding;
mod store;

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

pub use embedding::{cosine_similarity, embed, EMBEDDING_DIM};
pub use store::SqliteDocumentStore;

use crate::error::Result;

/// Document persistence and similarity search
pub trait DocumentStore: Send + Sync {
    /// Persist a document
    fn save(&self, text: &str) -> Result<()>;

    /// Search by similarity, returning a ranked textual summary of the
    /// closest documents (empty when nothing is stored)
    fn search(&self, text: &str) -> Result<String>;
}

/// Inert store used when the database is unavailable or documents are
/// disabled: saves vanish, searches match nothing.
pub struct NoopDocumentStore;

impl DocumentStore for NoopDocumentStore {
    fn save(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn search(&self, _text: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// Open the sqlite store at `path`, degrading to [`NoopDocumentStore`] with
/// a warning when it cannot be opened.
pub fn open_or_noop(path: &Path) -> Arc<dyn DocumentStore> {
    match SqliteDocumentStore::open(path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "document store unavailable, notes disabled");
            Arc::new(NoopDocumentStore)
        }
    }
}
