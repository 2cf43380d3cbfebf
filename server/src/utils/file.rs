//! File utility functions

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Expand a path string to an absolute path.
///
/// Handles `~` and `~/path` (home directory), relative paths and bare names
/// (resolved against the current directory). Absolute paths pass through.
///
/// ```text
/// expand_path("~/.fmak")     // -> /home/user/.fmak
/// expand_path("./fmak.json") // -> /current/dir/fmak.json
/// expand_path("/etc/fmak")   // -> /etc/fmak
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    // without a home directory, "~" stays literal and resolves relative
    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    };

    // "." and ".." are kept as components, not canonicalized
    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Inline argument value, or the contents of a file when written as `@path`
pub fn read_inline_or_file(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let path = expand_path(path);
            tracing::debug!(path = %path.display(), "Reading argument from file");
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => Ok(arg.to_string()),
    }
}
