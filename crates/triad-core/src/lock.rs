use crate::error::{IoContext, Result, TriadError};
use crate::paths;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_RETRY_MS: u64 = 50;

/// Advisory exclusive lock on `.triad/.lock`, released on drop.
///
/// Serializes the load → decide → persist → regenerate sequence of mutating
/// operations across the CLI and MCP processes.
#[derive(Debug)]
pub struct ProjectLock {
    file: File,
    path: PathBuf,
}

impl ProjectLock {
    /// Block until the lock is acquired or `timeout` elapses.
    /// The `.triad/` directory must already exist.
    pub fn acquire(root: &Path, timeout: Duration) -> Result<Self> {
        let path = paths::lock_path(root);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .at("open lock", &path)?;

        let start = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => break,
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    if start.elapsed() >= timeout {
                        return Err(TriadError::LockTimeout {
                            path,
                            secs: timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(Duration::from_millis(LOCK_RETRY_MS));
                }
                Err(err) => return Err(err).at("lock", &path),
            }
        }

        tracing::debug!(path = %path.display(), "project lock acquired");
        Ok(Self { file, path })
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release project lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_holder_times_out() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".triad")).unwrap();

        let _held = ProjectLock::acquire(dir.path(), Duration::from_secs(1)).unwrap();
        let err = ProjectLock::acquire(dir.path(), Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, TriadError::LockTimeout { .. }));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".triad")).unwrap();

        drop(ProjectLock::acquire(dir.path(), Duration::from_secs(1)).unwrap());
        ProjectLock::acquire(dir.path(), Duration::from_millis(100)).unwrap();
    }

    #[test]
    fn missing_working_dir_fails_without_creating_it() {
        let dir = TempDir::new().unwrap();
        assert!(ProjectLock::acquire(dir.path(), Duration::from_millis(10))
            .unwrap_err()
            .is_io());
        assert!(!dir.path().join(".triad").exists());
    }
}
