use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `TRIAD_ROOT` env var (passed in as `explicit`)
/// 2. Nearest ancestor of the working directory containing `.triad/`
/// 3. Nearest ancestor containing `.git/`
/// 4. The working directory itself
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover(&cwd)
}

fn discover(start: &Path) -> PathBuf {
    find_ancestor_with(start, ".triad")
        .or_else(|| find_ancestor_with(start, ".git"))
        .unwrap_or_else(|| start.to_path_buf())
}

fn find_ancestor_with(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}
