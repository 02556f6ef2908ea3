//! The project context state machine.
//!
//! `Project` owns the in-memory context and is the only component that
//! sequences writes across the session record, the feature directories and
//! the guidance files. Every mutating operation follows the same order:
//! check initialization, take the advisory lock, re-read durable state,
//! persist the transition, regenerate guidance, and only then update the
//! in-memory context. A failure at any step leaves memory untouched.

use crate::config::Config;
use crate::error::{Result, TriadError};
use crate::feature::{self, FeatureInfo};
use crate::lock::ProjectLock;
use crate::rules::{GuidanceFiles, RulesSync};
use crate::types::Phase;
use crate::{io, paths, session};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The active development context. An active feature always carries an
/// assigned phase; `Idle` is the only state whose phase is `Phase::None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Context {
    #[default]
    Idle,
    Active { feature: String, phase: Phase },
}

impl Context {
    pub fn feature(&self) -> Option<&str> {
        match self {
            Context::Idle => None,
            Context::Active { feature, .. } => Some(feature),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Context::Idle => Phase::None,
            Context::Active { phase, .. } => *phase,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome / Status
// ---------------------------------------------------------------------------

/// Result of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub message: String,
    /// True when the guidance files now describe a different context.
    pub guidance_changed: bool,
    /// Set when a phase change lands on a phase with existing work.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub impact: bool,
}

impl Outcome {
    fn changed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            guidance_changed: true,
            impact: false,
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            guidance_changed: false,
            impact: false,
        }
    }
}

/// Read-only snapshot of durable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub initialized: bool,
    pub feature: Option<String>,
    pub phase: Phase,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

pub struct Project<R = GuidanceFiles> {
    root: PathBuf,
    context: Context,
    rules: R,
    config: Config,
}

impl Project<GuidanceFiles> {
    /// Open the project at `root` with guidance files taken from its config.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let cfg = Config::load(&root)?;
        let rules = GuidanceFiles::from_config(&cfg);
        Ok(Self::build(root, rules, cfg))
    }

    /// Open the project for `init`. A config that no longer parses is
    /// replaced by defaults so `init --clean` can rebuild it.
    pub fn open_for_init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let cfg = match Config::load(&root) {
            Err(e @ TriadError::CorruptRecord { .. }) => {
                tracing::warn!(error = %e, "ignoring unreadable config; using defaults");
                Config::for_root(&root)
            }
            other => other?,
        };
        let rules = GuidanceFiles::from_config(&cfg);
        Ok(Self::build(root, rules, cfg))
    }
}

impl<R: RulesSync> Project<R> {
    pub fn with_rules(root: impl Into<PathBuf>, rules: R) -> Result<Self> {
        let root = root.into();
        let cfg = Config::load(&root)?;
        Ok(Self::build(root, rules, cfg))
    }

    fn build(root: PathBuf, rules: R, config: Config) -> Self {
        let context = match read_context(&root) {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!(error = %e, "could not restore active feature; starting idle");
                Context::Idle
            }
        };
        Self {
            root,
            context,
            rules,
            config,
        }
    }

    // ---------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn current_feature(&self) -> Option<&str> {
        self.context.feature()
    }

    pub fn current_phase(&self) -> Phase {
        self.context.phase()
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.config.lock.timeout_secs)
    }

    pub fn is_initialized(&self) -> bool {
        paths::triad_dir(&self.root).is_dir()
    }

    // ---------------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------------

    /// Initialize the working directory. Without `clean` an initialized
    /// project is left as is; with `clean` all state is wiped and rebuilt,
    /// keeping only the config settings.
    pub fn init(&mut self, clean: bool) -> Result<Outcome> {
        self.init_inner(clean).map_err(|e| e.during("init"))
    }

    fn init_inner(&mut self, clean: bool) -> Result<Outcome> {
        if !self.is_initialized() {
            io::ensure_dir(&paths::features_dir(&self.root))?;
            self.config.save(&self.root)?;
            self.rules.sync(&self.root, None, Phase::None)?;
            self.context = Context::Idle;
            tracing::info!(root = %self.root.display(), "initialized");
            return Ok(Outcome::changed(format!(
                "Initialized triad in {}",
                self.root.display()
            )));
        }

        if !clean {
            return Ok(Outcome::unchanged("Already initialized"));
        }

        let _lock = ProjectLock::acquire(&self.root, self.lock_timeout())?;
        session::clear_active_feature(&self.root)?;
        io::clear_dir_except(&paths::triad_dir(&self.root), &[paths::LOCK_FILE_NAME])?;
        io::ensure_dir(&paths::features_dir(&self.root))?;
        self.config.save(&self.root)?;
        self.rules.sync(&self.root, None, Phase::None)?;

        self.context = Context::Idle;
        tracing::info!(root = %self.root.display(), "reinitialized from clean");
        Ok(Outcome::changed("Reinitialized triad; all features and session state removed"))
    }

    /// Create a feature and make it the active one, starting in the first phase.
    pub fn create_feature(&mut self, name: &str) -> Result<Outcome> {
        self.guarded("create_feature", |p| {
            let info = feature::create_feature(&p.root, name)?;
            session::save_active_feature(&p.root, &info.name)?;
            p.rules.sync(&p.root, Some(&info.name), info.phase)?;

            let message = format!(
                "Created feature '{}' and entered phase {}",
                info.name, info.phase
            );
            p.context = Context::Active {
                feature: info.name,
                phase: info.phase,
            };
            Ok(Outcome::changed(message))
        })
    }

    /// Make an existing feature active without touching its phase.
    pub fn enter_feature(&mut self, name: &str) -> Result<Outcome> {
        self.guarded("enter_feature", |p| {
            let phase = feature::get_feature_phase(&p.root, name)?;
            feature::ensure_phase_dir(&p.root, name, phase)?;
            session::save_active_feature(&p.root, name)?;
            p.rules.sync(&p.root, Some(name), phase)?;

            p.context = Context::Active {
                feature: name.to_string(),
                phase,
            };
            Ok(Outcome::changed(format!(
                "Entered feature '{name}' (phase: {phase})"
            )))
        })
    }

    /// Move the active feature to `target`. Any phase may be targeted, in
    /// either direction.
    pub fn change_phase(&mut self, target: &str) -> Result<Outcome> {
        self.guarded("change_phase", |p| {
            let (feature, current) = p.require_active()?;
            let target = Phase::from_str(target)?;
            if !target.is_assigned() {
                return Err(TriadError::InvalidPhase(target.as_str().to_string()));
            }
            p.apply_phase(feature, current, target)
        })
    }

    /// Move the active feature one step along define → design → deliver.
    pub fn advance_phase(&mut self) -> Result<Outcome> {
        self.guarded("advance_phase", |p| {
            let (feature, current) = p.require_active()?;
            p.apply_phase(feature, current, current.next())
        })
    }

    /// Leave the active feature. Succeeds when nothing is active.
    pub fn exit_feature(&mut self) -> Result<Outcome> {
        self.guarded("exit_feature", |p| {
            let previous = session::load_active_feature(&p.root).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "clearing unreadable session record");
                None
            });
            session::clear_active_feature(&p.root)?;
            p.rules.sync(&p.root, None, Phase::None)?;

            p.context = Context::Idle;
            Ok(match previous {
                Some(name) => Outcome::changed(format!("Exited feature '{name}'")),
                None => Outcome::unchanged("No active feature"),
            })
        })
    }

    /// Durable state as seen by this invocation.
    pub fn status(&self) -> Result<Status> {
        if !self.is_initialized() {
            return Ok(Status {
                initialized: false,
                feature: None,
                phase: Phase::None,
            });
        }
        let ctx = read_context(&self.root).map_err(|e| e.during("status"))?;
        Ok(Status {
            initialized: true,
            feature: ctx.feature().map(str::to_string),
            phase: ctx.phase(),
        })
    }

    pub fn list_features(&self) -> Result<Vec<FeatureInfo>> {
        if !self.is_initialized() {
            return Err(TriadError::NotInitialized);
        }
        feature::list_features(&self.root).map_err(|e| e.during("list_features"))
    }

    // ---------------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------------

    /// Run a mutating operation: initialized check, advisory lock, error tagging.
    fn guarded<T>(&mut self, op: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if !self.is_initialized() {
            return Err(TriadError::NotInitialized);
        }
        let _lock = ProjectLock::acquire(&self.root, self.lock_timeout()).map_err(|e| e.during(op))?;
        let result = f(self).map_err(|e| e.during(op));
        if let Err(ref e) = result {
            tracing::debug!(op, error = %e, "operation failed");
        }
        result
    }

    /// Active feature and its persisted phase, re-read from disk.
    fn require_active(&self) -> Result<(String, Phase)> {
        match read_context(&self.root)? {
            Context::Active { feature, phase } => Ok((feature, phase)),
            Context::Idle => Err(TriadError::NoActiveFeature),
        }
    }

    fn apply_phase(&mut self, feature: String, current: Phase, target: Phase) -> Result<Outcome> {
        if target == current {
            self.context = Context::Active {
                feature: feature.clone(),
                phase: current,
            };
            return Ok(Outcome::unchanged(format!(
                "Feature '{feature}' is already in phase {current}"
            )));
        }

        let impact = feature::phase_dir_exists(&self.root, &feature, target);
        feature::set_feature_phase(&self.root, &feature, target)?;
        feature::ensure_phase_dir(&self.root, &feature, target)?;
        session::save_active_feature(&self.root, &feature)?;
        self.rules.sync(&self.root, Some(&feature), target)?;

        tracing::debug!(feature = %feature, from = %current, to = %target, impact, "phase changed");
        let mut message = format!("Feature '{feature}' moved from {current} to {target}");
        if impact {
            message.push_str(&format!(
                "\nwarning: {target} work already exists in {}/{feature}/{target}/; \
                 review it before continuing, it may need reconciling or will be overwritten",
                paths::FEATURES_DIR
            ));
        }

        self.context = Context::Active {
            feature,
            phase: target,
        };
        Ok(Outcome {
            message,
            guidance_changed: true,
            impact,
        })
    }
}

/// Rebuild the context from the session record and feature manifest.
fn read_context(root: &Path) -> Result<Context> {
    let Some(feature) = session::load_active_feature(root)? else {
        return Ok(Context::Idle);
    };
    match feature::get_feature_phase(root, &feature) {
        Ok(phase) => Ok(Context::Active { feature, phase }),
        Err(TriadError::FeatureNotFound(_)) => {
            tracing::warn!(feature = %feature, "session names a feature that no longer exists");
            Ok(Context::Idle)
        }
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
