//! # chat - Interactive Terminal Chat
//!
//! `chat` is a command-line tool for conversing with OpenAI-compatible
//! chat-completion endpoints. It keeps an editable, persistable
//! conversation transcript and mixes free-text messages with
//! slash-prefixed control commands.
//!
//! ## Features
//!
//! - **Slash commands**: `/save`, `/undo`, `/system`, `/timeout` and
//!   friends, with tab-autocomplete
//! - **Persistable history**: save and reload conversations as
//!   human-readable JSON
//! - **Failure recovery**: failed or aborted requests never leave an
//!   unanswered question in the transcript
//! - **Token accounting**: per-exchange and session-total usage counters
//!
//! ## Quick Start
//!
//! ```bash
//! # Start a session (reads OPENAI_API_KEY)
//! chat
//!
//! # Resume a saved conversation
//! chat --load ./chat_history_2026-08-07_12-00-00.json
//!
//! # Use a different credential variable, start in raw mode
//! chat --key MY_PROXY_KEY -r
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/chat/config.toml`:
//!
//! ```toml
//! [chat]
//! endpoint = "https://api.openai.com/v1/chat/completions"
//! model = "gpt-3.5-turbo"
//! timeout = 20.0
//! api_key_env = "OPENAI_API_KEY"
//! system_prompt = "You are a helpful assistant."
//! ```

/// Interactive chat session: transcript, commands, session loop.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Completion client for OpenAI-compatible chat APIs.
pub mod completion;

/// Configuration file management and environment resolution.
pub mod config;

/// File system utilities.
pub mod fs;

/// Session logging to the data directory.
pub mod logging;

/// XDG-style path utilities for configuration and data.
pub mod paths;

/// Terminal UI components (console, prompts, spinner, colors).
pub mod ui;
