use crate::error::{IoContext, Result, TriadError};
use crate::types::Phase;
use crate::{io, paths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// PhaseTransition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub phase: Phase,
    pub entered: DateTime<Utc>,
    pub exited: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// FeatureInfo
// ---------------------------------------------------------------------------

/// Per-feature manifest stored at `.triad/features/<name>/manifest.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub name: String,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub phase_history: Vec<PhaseTransition>,
}

impl FeatureInfo {
    fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let phase = Phase::first();
        Self {
            name: name.into(),
            phase,
            created_at: now,
            updated_at: now,
            phase_history: vec![PhaseTransition {
                phase,
                entered: now,
                exited: None,
            }],
        }
    }

    pub fn load(root: &Path, name: &str) -> Result<Self> {
        let manifest = paths::feature_manifest(root, name);
        let Some(data) = io::read_if_exists(&manifest)? else {
            return Err(TriadError::FeatureNotFound(name.to_string()));
        };
        let info: FeatureInfo =
            serde_yaml::from_str(&data).map_err(|e| TriadError::CorruptRecord {
                path: manifest.clone(),
                message: e.to_string(),
            })?;
        if !info.phase.is_assigned() {
            return Err(TriadError::CorruptRecord {
                path: manifest,
                message: "feature has no phase".to_string(),
            });
        }
        Ok(info)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::feature_manifest(root, &self.name);
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&manifest, data.as_bytes())
    }

    fn record_phase(&mut self, phase: Phase) {
        let now = Utc::now();
        if let Some(last) = self.phase_history.last_mut() {
            last.exited = Some(now);
        }
        self.phase = phase;
        self.updated_at = now;
        self.phase_history.push(PhaseTransition {
            phase,
            entered: now,
            exited: None,
        });
    }
}

// ---------------------------------------------------------------------------
// Feature directory operations
// ---------------------------------------------------------------------------

/// A feature exists when its manifest does; a bare directory is not a feature.
pub fn feature_exists(root: &Path, name: &str) -> bool {
    paths::feature_manifest(root, name).is_file()
}

/// Create the feature directory, its manifest and the working directory of
/// its first phase.
pub fn create_feature(root: &Path, name: &str) -> Result<FeatureInfo> {
    paths::validate_slug(name)?;
    if feature_exists(root, name) {
        return Err(TriadError::FeatureExists(name.to_string()));
    }

    let info = FeatureInfo::new(name);
    info.save(root)?;
    ensure_phase_dir(root, name, info.phase)?;
    tracing::debug!(feature = name, phase = %info.phase, "feature created");
    Ok(info)
}

pub fn get_feature_phase(root: &Path, name: &str) -> Result<Phase> {
    if !paths::is_valid_slug(name) {
        return Err(TriadError::FeatureNotFound(name.to_string()));
    }
    Ok(FeatureInfo::load(root, name)?.phase)
}

/// Overwrite the persisted phase. No ordering is enforced here.
pub fn set_feature_phase(root: &Path, name: &str, phase: Phase) -> Result<()> {
    if !phase.is_assigned() {
        return Err(TriadError::InvalidPhase(phase.as_str().to_string()));
    }
    let mut info = FeatureInfo::load(root, name)?;
    info.record_phase(phase);
    info.save(root)
}

/// True if work for `phase` has been started before (its directory exists).
pub fn phase_dir_exists(root: &Path, name: &str, phase: Phase) -> bool {
    phase.is_assigned() && paths::phase_dir(root, name, phase).is_dir()
}

pub fn ensure_phase_dir(root: &Path, name: &str, phase: Phase) -> Result<()> {
    if !phase.is_assigned() {
        return Ok(());
    }
    io::ensure_dir(&paths::phase_dir(root, name, phase))
}

/// All features with a readable manifest, oldest first.
pub fn list_features(root: &Path) -> Result<Vec<FeatureInfo>> {
    let dir = paths::features_dir(root);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut features = Vec::new();
    for entry in std::fs::read_dir(&dir).at("read directory", &dir)?.flatten() {
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match FeatureInfo::load(root, &name) {
            Ok(f) => features.push(f),
            Err(TriadError::FeatureNotFound(_)) => {
                tracing::warn!(feature = %name, "skipping feature directory without a manifest");
            }
            Err(e) => {
                tracing::warn!(feature = %name, error = %e, "skipping unreadable feature");
            }
        }
    }
    features.sort_by(|a, b| (a.created_at, &a.name).cmp(&(b.created_at, &b.name)));
    Ok(features)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
