// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM message model and transport
//!
//! `message` defines the conversation data model and its wire form,
//! `transport` the narrow seam to the remote service, `openai` the HTTP
//! implementation, and `mock` a scriptable transport for tests.

pub mod message;
pub mod mock;
pub mod openai;
pub mod transport;
