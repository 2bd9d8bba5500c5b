// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenAI-compatible chat transport
//!
//! Speaks the `/chat/completions` wire format with the legacy
//! `functions`/`function_call` fields. No streaming, no retries: one request,
//! one reply, failures surface to the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ParleyError, Result};
use crate::functions::FunctionSchema;
use crate::llm::message::{FunctionCall, MessageRecord};
use crate::llm::transport::{ChatTransport, TransportReply};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// HTTP transport for an OpenAI-compatible chat completions endpoint
pub struct OpenAiTransport {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTransport {
    /// Create a transport for the default endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            model: model.into(),
        }
    }

    /// Create a transport with a custom endpoint URL
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// The model requests are sent for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Map a non-success response body to an [`ApiError`]
    fn parse_error(status: u16, body: &str) -> ParleyError {
        if status == 401 {
            return ParleyError::Api(ApiError::AuthenticationFailed);
        }
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        ParleyError::Api(ApiError::ServerError { status, message })
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn send(
        &self,
        payload: &[MessageRecord],
        functions: Option<&[FunctionSchema]>,
    ) -> Result<TransportReply> {
        let request = ChatRequest {
            model: &self.model,
            messages: payload,
            functions,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ParleyError::Api(ApiError::InvalidResponse(e.to_string())))?;

        let message = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| {
                ParleyError::Api(ApiError::InvalidResponse("response has no choices".to_string()))
            })?;

        // Classify once: the presence of function_call decides the variant.
        if let Some(call) = message.function_call {
            Ok(TransportReply::FunctionCall(call))
        } else if let Some(content) = message.content {
            Ok(TransportReply::Content(content))
        } else {
            Err(ParleyError::Api(ApiError::InvalidResponse(
                "reply carries neither content nor function_call".to_string(),
            )))
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [MessageRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<&'a [FunctionSchema]>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}
