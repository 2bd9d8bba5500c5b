// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for Parley
//!
//! Handles loading and saving settings from ~/.parley/settings.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Main settings structure, stored in ~/.parley/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Conversation and token management settings
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Note-document store settings
    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// Configuration for the remote chat API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Chat completions endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used when none is given on the command line
    #[serde(default = "default_model")]
    pub default_model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            default_model: default_model(),
        }
    }
}

/// Conversation and token management settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Token budget a persisted conversation may retain
    #[serde(default = "default_max_token_count")]
    pub max_token_count: usize,

    /// Estimated characters per token for budget accounting
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,

    /// Maximum function-call rounds within one turn
    #[serde(default = "default_max_function_rounds")]
    pub max_function_rounds: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_token_count: default_max_token_count(),
            chars_per_token: default_chars_per_token(),
            max_function_rounds: default_max_function_rounds(),
        }
    }
}

/// Note-document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Whether the document functions get a real store
    #[serde(default = "default_documents_enabled")]
    pub enabled: bool,

    /// Database filename under the parley home directory
    #[serde(default = "default_documents_filename")]
    pub db_filename: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            enabled: default_documents_enabled(),
            db_filename: default_documents_filename(),
        }
    }
}

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::parley_home().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path. A missing file yields defaults.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the parley home directory (~/.parley or $PARLEY_HOME).
    pub fn parley_home() -> PathBuf {
        if let Ok(home) = std::env::var("PARLEY_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".parley")
    }

    /// Directory holding one persisted record per conversation name
    pub fn history_path() -> PathBuf {
        Self::parley_home().join("history")
    }

    /// Path of the note-document database
    pub fn documents_path(&self) -> PathBuf {
        Self::parley_home().join(&self.documents.db_filename)
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-4-1106-preview".to_string()
}

fn default_max_token_count() -> usize {
    8000
}

fn default_chars_per_token() -> usize {
    4
}

fn default_max_function_rounds() -> usize {
    8
}

fn default_documents_enabled() -> bool {
    true
}

fn default_documents_filename() -> String {
    "documents.db".to_string()
}
