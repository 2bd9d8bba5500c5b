// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sqlite-backed document store
//!
//! One table of documents with their embeddings; search is a brute-force
//! cosine scan, ranked and capped. Fine for a personal note collection.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use super::embedding::{cosine_similarity, embed};
use super::DocumentStore;
use crate::error::{ParleyError, Result};

/// Maximum documents returned by a search
const SEARCH_LIMIT: usize = 10;

/// Document store backed by a local sqlite database
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| ParleyError::Persistence(format!("failed to open document db: {}", e)))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY,
                text TEXT NOT NULL,
                embedding BLOB NOT NULL
            )",
            [],
        )
        .map_err(|e| ParleyError::Persistence(format!("failed to init document schema: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store, for tests
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ParleyError::Persistence(e.to_string()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY,
                text TEXT NOT NULL,
                embedding BLOB NOT NULL
            )",
            [],
        )
        .map_err(|e| ParleyError::Persistence(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn encode_embedding(vector: &[f32]) -> Vec<u8> {
        vector.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn decode_embedding(blob: &[u8]) -> Vec<f32> {
        blob.chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn save(&self, text: &str) -> Result<()> {
        let embedding = Self::encode_embedding(&embed(text));
        let conn = self.conn.lock().expect("document store lock poisoned");
        conn.execute(
            "INSERT INTO documents (text, embedding) VALUES (?1, ?2)",
            rusqlite::params![text, embedding],
        )
        .map_err(|e| ParleyError::Persistence(format!("failed to save document: {}", e)))?;
        Ok(())
    }

    fn search(&self, text: &str) -> Result<String> {
        let query = embed(text);
        let conn = self.conn.lock().expect("document store lock poisoned");
        let mut stmt = conn
            .prepare("SELECT id, text, embedding FROM documents")
            .map_err(|e| ParleyError::Persistence(format!("failed to query documents: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let doc_text: String = row.get(1)?;
                let blob: Vec<u8> = row.get(2)?;
                Ok((id, doc_text, blob))
            })
            .map_err(|e| ParleyError::Persistence(format!("failed to query documents: {}", e)))?;

        let mut scored: Vec<(i64, String, f32)> = Vec::new();
        for row in rows {
            let (id, doc_text, blob) =
                row.map_err(|e| ParleyError::Persistence(format!("failed to read row: {}", e)))?;
            let score = cosine_similarity(&query, &Self::decode_embedding(&blob));
            scored.push((id, doc_text, score));
        }

        scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

        let summary = scored
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|(id, doc_text, _)| format!("Document ID: {}\n{}\n", id, doc_text))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(summary)
    }
}
