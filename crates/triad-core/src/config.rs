use crate::error::{Result, TriadError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

// ---------------------------------------------------------------------------
// GuidanceConfig
// ---------------------------------------------------------------------------

/// Files that carry the managed guidance section, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceConfig {
    #[serde(default = "default_guidance_files")]
    pub files: Vec<String>,
}

fn default_guidance_files() -> Vec<String> {
    vec![paths::AGENTS_MD.to_string()]
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            files: default_guidance_files(),
        }
    }
}

// ---------------------------------------------------------------------------
// LockConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    #[serde(default = "default_lock_timeout")]
    pub timeout_secs: u64,
}

fn default_lock_timeout() -> u64 {
    5
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_lock_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub guidance: GuidanceConfig,
    #[serde(default)]
    pub lock: LockConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig {
                name: project_name.into(),
            },
            guidance: GuidanceConfig::default(),
            lock: LockConfig::default(),
        }
    }

    /// Defaults used when `.triad/config.yaml` is absent.
    pub fn for_root(root: &Path) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        Self::new(name)
    }

    /// Load the project config, falling back to defaults when the file is missing.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        match crate::io::read_if_exists(&path)? {
            None => Ok(Self::for_root(root)),
            Some(data) => serde_yaml::from_str(&data).map_err(|e| TriadError::CorruptRecord {
                path,
                message: e.to_string(),
            }),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
