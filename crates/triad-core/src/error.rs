use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriadError {
    #[error("not initialized: run 'triad init'")]
    NotInitialized,

    #[error("no active feature: run 'triad feature enter <name>' first")]
    NoActiveFeature,

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("feature already exists: {0}")]
    FeatureExists(String),

    #[error("invalid phase '{0}': expected one of define, design, deliver")]
    InvalidPhase(String),

    #[error("invalid feature name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        op: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record at {}: {message}", path.display())]
    CorruptRecord { path: PathBuf, message: String },

    #[error("timed out after {secs}s waiting for lock {}", path.display())]
    LockTimeout { path: PathBuf, secs: u64 },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl TriadError {
    /// Prefix the failing orchestrator operation onto storage errors.
    pub fn during(self, operation: &str) -> Self {
        match self {
            TriadError::Io { op, path, source } => TriadError::Io {
                op: format!("{operation}: {op}"),
                path,
                source,
            },
            other => other,
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, TriadError::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, TriadError>;

/// Attach the attempted operation and path to a raw `std::io` result.
pub(crate) trait IoContext<T> {
    fn at(self, op: &str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, op: &str, path: &Path) -> Result<T> {
        self.map_err(|source| TriadError::Io {
            op: op.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}
