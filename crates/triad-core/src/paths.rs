use crate::error::{Result, TriadError};
use crate::types::Phase;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TRIAD_DIR: &str = ".triad";
pub const FEATURES_DIR: &str = ".triad/features";

pub const SESSION_FILE: &str = ".triad/.session";
pub const LOCK_FILE: &str = ".triad/.lock";
pub const LOCK_FILE_NAME: &str = ".lock";
pub const CONFIG_FILE: &str = ".triad/config.yaml";

pub const MANIFEST_FILE: &str = "manifest.yaml";
pub const AGENTS_MD: &str = "AGENTS.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn triad_dir(root: &Path) -> PathBuf {
    root.join(TRIAD_DIR)
}

pub fn features_dir(root: &Path) -> PathBuf {
    root.join(FEATURES_DIR)
}

pub fn feature_dir(root: &Path, name: &str) -> PathBuf {
    features_dir(root).join(name)
}

pub fn feature_manifest(root: &Path, name: &str) -> PathBuf {
    feature_dir(root, name).join(MANIFEST_FILE)
}

/// Working directory for one phase of a feature, e.g. `.triad/features/auth/design`.
pub fn phase_dir(root: &Path, name: &str, phase: Phase) -> PathBuf {
    feature_dir(root, name).join(phase.as_str())
}

pub fn session_path(root: &Path) -> PathBuf {
    root.join(SESSION_FILE)
}

pub fn lock_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= 64 && slug_re().is_match(slug)
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if !is_valid_slug(slug) {
        return Err(TriadError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
