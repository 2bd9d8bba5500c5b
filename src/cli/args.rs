// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::Parser;

/// Parley - persistent LLM conversations from your terminal
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version, about = "Persistent LLM conversations with host-side function calling")]
pub struct Cli {
    /// Message to send to the model
    pub message: Option<String>,

    /// Read the message from stdin
    #[arg(short = 's', long)]
    pub stdin: bool,

    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Conversation name
    #[arg(short, long, default_value = "default")]
    pub conversation: String,

    /// Maximum token count threshold
    #[arg(short = 't', long)]
    pub threshold: Option<usize>,

    /// Print the last message in this conversation and exit
    #[arg(short = 'r', long)]
    pub retrieve_last: bool,

    /// Print the conversation's token count and exit
    #[arg(short = 'n', long)]
    pub token_count: bool,

    /// Disable host-side functions for this turn
    #[arg(long)]
    pub disable_functions: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
