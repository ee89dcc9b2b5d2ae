//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Chat session bootstrap.
pub mod chat;

pub use args::Args;
