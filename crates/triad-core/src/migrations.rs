use crate::config::Config;
use crate::error::{Result, TriadError};
use crate::lock::ProjectLock;
use crate::rules::{GuidanceFiles, RulesSync};
use crate::types::Phase;
use crate::{feature, io, paths, session};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Session record written by releases that stored the phase alongside the
/// active feature.
#[derive(Debug, Deserialize)]
struct LegacySession {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    feature: String,
    #[serde(default)]
    phase: String,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
}

/// Convert a structured `.triad/.session` into the plain-text layout.
///
/// The recorded phase moves into the feature's manifest. A record naming a
/// feature that no longer exists is cleared. Guidance files are regenerated
/// to match. Returns `true` if anything was rewritten; a session already in
/// the plain layout is left untouched.
pub fn migrate_legacy_session(root: &Path) -> Result<bool> {
    if !paths::triad_dir(root).is_dir() {
        return Err(TriadError::NotInitialized);
    }
    let cfg = Config::load(root)?;
    let _lock = ProjectLock::acquire(root, Duration::from_secs(cfg.lock.timeout_secs))?;
    let rules = GuidanceFiles::from_config(&cfg);

    let path = paths::session_path(root);
    let Some(raw) = io::read_if_exists(&path)? else {
        return Ok(false);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || paths::is_valid_slug(trimmed) {
        return Ok(false);
    }

    let legacy: LegacySession =
        serde_yaml::from_str(trimmed).map_err(|e| TriadError::CorruptRecord {
            path: path.clone(),
            message: format!("not a recognised session layout: {e}"),
        })?;
    tracing::info!(
        version = legacy.version,
        feature = %legacy.feature,
        phase = %legacy.phase,
        last_modified = ?legacy.last_modified,
        "migrating structured session record"
    );

    let name = legacy.feature.trim();
    if !paths::is_valid_slug(name) || !feature::feature_exists(root, name) {
        if !name.is_empty() {
            tracing::warn!(feature = name, "session named a missing feature; clearing it");
        }
        session::clear_active_feature(root)?;
        rules.sync(root, None, Phase::None)?;
        return Ok(true);
    }

    let recorded = Phase::from_str(legacy.phase.trim())?;
    let mut phase = feature::get_feature_phase(root, name)?;
    if recorded.is_assigned() && recorded != phase {
        feature::set_feature_phase(root, name, recorded)?;
        feature::ensure_phase_dir(root, name, recorded)?;
        phase = recorded;
    }
    session::save_active_feature(root, name)?;
    rules.sync(root, Some(name), phase)?;
    Ok(true)
}
