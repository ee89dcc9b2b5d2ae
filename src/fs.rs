//! File system utilities.

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Writes content to a file atomically using a temp file and rename.
///
/// This prevents a half-written chat history if the process is interrupted
/// (e.g., Ctrl+C during a save). The temp file is created in the same
/// directory as the target file to ensure the rename operation is atomic
/// (same filesystem). Missing parent directories are created first.
///
/// # Errors
///
/// Returns an error if the directory, temp file, or rename fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
    }

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    // Write to temp file first
    fs::write(&temp_path, content)?;

    // Atomic rename (same filesystem)
    fs::rename(&temp_path, path)?;

    Ok(())
}
