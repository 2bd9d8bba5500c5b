// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Deterministic text embeddings
//!
//! A hashed bag-of-words projection: each lowercased alphanumeric token is
//! hashed into a fixed-size vector of term counts. No model download, no
//! remote service, stable across runs on the same platform. Coarse, but
//! cosine ranking over it is enough to pull the right note back out.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Dimension of every embedding vector
pub const EMBEDDING_DIM: usize = 256;

/// Embed `text` as hashed term counts
pub fn embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0f32; EMBEDDING_DIM];
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        vector[(hasher.finish() as usize) % EMBEDDING_DIM] += 1.0;
    }
    vector
}

/// Calculate cosine similarity between two vectors
///
/// Returns a value between -1.0 and 1.0; 0.0 for mismatched lengths or zero
/// vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
