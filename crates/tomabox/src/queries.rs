//! Identity source: newline-delimited login payloads.

use std::path::Path;

use crate::error::{BotError, Result};

/// Read every non-blank line of `path` as one login payload.
///
/// # Errors
///
/// Returns `BotError::Config` if the file is missing or holds no payloads,
/// or `BotError::Io` if it cannot be read.
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if !path.exists() {
        return Err(BotError::Config(format!(
            "File '{label}' Not Found. Please Ensure It Exists"
        )));
    }

    let queries = parse_queries(&std::fs::read_to_string(path)?);
    if queries.is_empty() {
        return Err(BotError::Config(format!("File '{label}' Is Empty")));
    }

    log::debug!("read {} queries from {}", queries.len(), path.display());
    Ok(queries)
}

/// Split text into trimmed, non-blank lines.
pub fn parse_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
