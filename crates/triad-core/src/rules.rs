use crate::config::Config;
use crate::error::Result;
use crate::types::Phase;
use crate::{io, paths};
use std::path::{Path, PathBuf};

/// Marker that delimits the managed triad section in guidance files.
pub const SECTION_START: &str = "<!-- triad:start -->";
/// Closing marker for the managed triad section.
pub const SECTION_END: &str = "<!-- triad:end -->";

// ---------------------------------------------------------------------------
// RulesSync
// ---------------------------------------------------------------------------

/// Regenerates assistant guidance for the active context.
///
/// `feature` is `None` (and `phase` is `Phase::None`) when no feature is
/// active; implementations then write baseline guidance.
pub trait RulesSync {
    fn sync(&self, root: &Path, feature: Option<&str>, phase: Phase) -> Result<()>;
}

// ---------------------------------------------------------------------------
// GuidanceFiles
// ---------------------------------------------------------------------------

/// Writes a marker-delimited section into each configured guidance file,
/// leaving any hand-written content around it untouched.
#[derive(Debug, Clone)]
pub struct GuidanceFiles {
    project_name: String,
    files: Vec<String>,
}

impl GuidanceFiles {
    pub fn new(project_name: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            project_name: project_name.into(),
            files,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.project.name.clone(), cfg.guidance.files.clone())
    }

    fn write_section(&self, path: &Path, section: &str) -> Result<()> {
        let Some(existing) = io::read_if_exists(path)? else {
            let content = format!(
                "# {}\n\nAgent instructions for {}.\n\n{section}\n",
                display_name(path),
                self.project_name
            );
            return io::atomic_write(path, content.as_bytes());
        };

        if existing.contains(SECTION_START) {
            if !io::replace_between_markers(path, SECTION_START, SECTION_END, section)? {
                tracing::warn!(
                    path = %path.display(),
                    "guidance file has triad:start but no triad:end marker, skipped"
                );
            }
            return Ok(());
        }

        let sep = if existing.is_empty() || existing.ends_with("\n\n") {
            ""
        } else if existing.ends_with('\n') {
            "\n"
        } else {
            "\n\n"
        };
        let content = format!("{existing}{sep}{section}\n");
        io::atomic_write(path, content.as_bytes())
    }
}

impl RulesSync for GuidanceFiles {
    fn sync(&self, root: &Path, feature: Option<&str>, phase: Phase) -> Result<()> {
        let section = build_marked_section(&self.project_name, feature, phase);
        for file in &self.files {
            let path: PathBuf = root.join(file);
            self.write_section(&path, &section)?;
        }
        tracing::debug!(feature = feature.unwrap_or(""), phase = %phase, "guidance synced");
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| paths::AGENTS_MD.to_string())
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Full managed section (start marker + content + end marker).
pub fn build_marked_section(project_name: &str, feature: Option<&str>, phase: Phase) -> String {
    let inner = match feature {
        Some(name) if phase.is_assigned() => active_section(project_name, name, phase),
        _ => baseline_section(project_name),
    };
    format!("{SECTION_START}{inner}{SECTION_END}")
}

fn baseline_section(project_name: &str) -> String {
    format!(
        "\n\n## triad\n\n\
        Project: {project_name}\n\n\
        No feature is active. Do not start implementation work until a feature is selected.\n\n\
        - `triad feature create <name>`: start a new feature in the define phase\n\
        - `triad feature enter <name>`: resume an existing feature\n\
        - `triad feature list`: show all features and their phases\n\n\
        Workflow: define → design → deliver\n\n"
    )
}

fn active_section(project_name: &str, feature: &str, phase: Phase) -> String {
    let workdir = format!("{}/{feature}/{}", paths::FEATURES_DIR, phase.as_str());
    format!(
        "\n\n## triad\n\n\
        Project: {project_name}\n\n\
        Active feature: `{feature}`\n\
        Phase: **{phase}**\n\
        Working directory: `{workdir}/`\n\n\
        ### Phase guidance\n\n\
        {guidance}\n\n\
        ### Commands\n\n\
        - `triad phase next`: move to the next phase\n\
        - `triad phase set <define|design|deliver>`: jump to a specific phase\n\
        - `triad feature exit`: leave this feature\n\n",
        phase = phase.label(),
        guidance = phase_guidance(phase),
    )
}

fn phase_guidance(phase: Phase) -> &'static str {
    match phase {
        Phase::None => "",
        Phase::Define => {
            "Clarify the problem. Capture goals, users, constraints and acceptance criteria. \
            Ask questions instead of assuming. Do not write production code in this phase."
        }
        Phase::Design => {
            "Decide how the feature will be built. Record components, data flow, interfaces \
            and trade-offs, then break the work into ordered tasks. Keep code to spikes \
            and prototypes."
        }
        Phase::Deliver => {
            "Implement the design task by task with tests. Keep changes small and verifiable. \
            If the design turns out wrong, say so and move back to design rather than \
            improvising."
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn guidance() -> GuidanceFiles {
        GuidanceFiles::new("shop", vec!["AGENTS.md".to_string()])
    }

    #[test]
    fn creates_missing_file_with_baseline() {
        let dir = TempDir::new().unwrap();
        guidance().sync(dir.path(), None, Phase::None).unwrap();

        let content = std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap();
        assert!(content.starts_with("# AGENTS.md"));
        assert!(content.contains(SECTION_START));
        assert!(content.contains("No feature is active"));
    }

    #[test]
    fn active_section_names_feature_and_phase() {
        let dir = TempDir::new().unwrap();
        guidance().sync(dir.path(), Some("checkout"), Phase::Design).unwrap();

        let content = std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap();
        assert!(content.contains("Active feature: `checkout`"));
        assert!(content.contains("Phase: **design**"));
        assert!(content.contains(".triad/features/checkout/design/"));
    }

    #[test]
    fn resync_replaces_section_once() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "# Team notes\n").unwrap();

        let g = guidance();
        g.sync(dir.path(), Some("checkout"), Phase::Define).unwrap();
        g.sync(dir.path(), Some("checkout"), Phase::Deliver).unwrap();

        let content = std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap();
        assert!(content.starts_with("# Team notes\n"));
        assert_eq!(content.matches(SECTION_START).count(), 1);
        assert!(content.contains("Phase: **deliver**"));
        assert!(!content.contains("Phase: **define**"));
    }

    #[test]
    fn dangling_start_marker_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let original = format!("notes\n{SECTION_START}\nbroken");
        std::fs::write(dir.path().join("AGENTS.md"), &original).unwrap();

        guidance().sync(dir.path(), None, Phase::None).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap(),
            original
        );
    }

    #[test]
    fn writes_every_configured_file() {
        let dir = TempDir::new().unwrap();
        let g = GuidanceFiles::new(
            "shop",
            vec!["AGENTS.md".to_string(), ".cursor/rules/triad.mdc".to_string()],
        );
        g.sync(dir.path(), Some("checkout"), Phase::Define).unwrap();
        assert!(dir.path().join("AGENTS.md").exists());
        let nested = std::fs::read_to_string(dir.path().join(".cursor/rules/triad.mdc")).unwrap();
        assert!(nested.contains("Active feature: `checkout`"));
    }
}
