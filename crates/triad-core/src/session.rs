//! Durable record of the active feature.
//!
//! The record is a plain-text file holding only the trimmed feature name.
//! Per-feature phases live in each feature's manifest, never here. Nothing is
//! cached: the command line and the MCP server run as separate processes and
//! each call re-reads the file.

use crate::error::{Result, TriadError};
use crate::{io, paths};
use std::path::Path;

/// Read the active feature name. `None` when no record exists or it is empty.
pub fn load_active_feature(root: &Path) -> Result<Option<String>> {
    let path = paths::session_path(root);
    let Some(raw) = io::read_if_exists(&path)? else {
        return Ok(None);
    };
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if !paths::is_valid_slug(name) {
        return Err(TriadError::CorruptRecord {
            path,
            message: "session does not hold a feature name; run 'triad migrate' if it was \
                      written by an older release"
                .to_string(),
        });
    }
    Ok(Some(name.to_string()))
}

/// Persist `name` as the active feature. An empty name records "no active feature".
pub fn save_active_feature(root: &Path, name: &str) -> Result<()> {
    let path = paths::session_path(root);
    io::atomic_write(&path, name.trim().as_bytes())
}

/// Remove the record. Idempotent.
pub fn clear_active_feature(root: &Path) -> Result<()> {
    io::remove_file_if_exists(&paths::session_path(root))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
