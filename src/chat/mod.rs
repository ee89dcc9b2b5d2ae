//! Interactive chat session.
//!
//! Provides a REPL-style interface with slash commands for controlling
//! the conversation, and the transcript state the session runs over.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod transcript;
mod ui;

pub use session::{ChatSession, SessionConfig, Settings};
pub use transcript::{Role, Transaction, Transcript, TranscriptError, Turn};
