//! Completion client for OpenAI-compatible chat APIs.

mod client;

pub use client::{CompletionClient, SendOutcome};
