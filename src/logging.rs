//! Session logging.
//!
//! Conversation events (messages, replies, errors, token totals) are
//! appended to a plain-text log in the data directory. Logging is a
//! convenience, not a requirement: failure to open the log never stops
//! the session, it just runs unlogged.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::paths;

/// Initializes the global tracing subscriber with a file writer at
/// `<data_dir>/chat.log`.
///
/// The `RUST_LOG` environment variable filters events; the default level
/// is `info`. Safe to call more than once: subsequent calls are no-ops.
pub fn init() {
    let log_dir = paths::data_dir();
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }

    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("chat.log"))
    else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}
