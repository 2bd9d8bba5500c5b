// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for Parley
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for Parley operations
#[derive(Error, Debug)]
pub enum ParleyError {
    /// API-related errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The model requested a function that is not registered
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A persisted or transport record carried an unrecognized role tag
    #[error("Unknown message role: {0}")]
    UnknownRole(String),

    /// Function-call arguments could not be parsed into an object
    #[error("Malformed function arguments: {0}")]
    MalformedArguments(String),

    /// A single turn exceeded the function-call round limit
    #[error("Function-call loop exceeded {0} rounds without a content reply")]
    ToolLoopExceeded(usize),

    /// Conversation record read/write errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed (invalid API key)
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },
}

/// Result type alias for Parley operations
pub type Result<T> = std::result::Result<T, ParleyError>;

impl From<reqwest::Error> for ParleyError {
    fn from(err: reqwest::Error) -> Self {
        ParleyError::Api(ApiError::Network(err.to_string()))
    }
}
