//! XDG-style path utilities for configuration and data directories.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use std::path::PathBuf;

/// Returns the configuration directory for chat.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/chat` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/chat` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join("chat"),
        |xdg| PathBuf::from(xdg).join("chat"),
    )
}

/// Returns the data directory for chat.
///
/// Session logs and emergency history backups are written here.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/chat` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/chat` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME").map_or_else(
        |_| home_dir().join(".local").join("share").join("chat"),
        |xdg| PathBuf::from(xdg).join("chat"),
    )
}

/// Returns the user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
#[allow(clippy::expect_used)]
fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Failed to determine home directory")
}
