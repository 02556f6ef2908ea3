use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Workflow phase of a feature. `None` means no phase is assigned and only
/// ever pairs with "no active feature".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    #[serde(rename = "")]
    None,
    Define,
    Design,
    Deliver,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[Phase::None, Phase::Define, Phase::Design, Phase::Deliver]
    }

    /// The phase a newly created feature starts in.
    pub fn first() -> Phase {
        Phase::Define
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Successor on the recommended path; saturates at `Deliver`.
    pub fn next(self) -> Phase {
        Phase::all()
            .get(self.index() + 1)
            .copied()
            .unwrap_or(Phase::Deliver)
    }

    /// True for every phase a feature can actually be in.
    pub fn is_assigned(self) -> bool {
        self != Phase::None
    }

    /// Returns true if `raw` is one of the four canonical phase strings.
    pub fn is_valid(raw: &str) -> bool {
        Self::all().iter().any(|p| p.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::None => "",
            Phase::Define => "define",
            Phase::Design => "design",
            Phase::Deliver => "deliver",
        }
    }

    /// Human-facing label; unlike `as_str` never empty.
    pub fn label(self) -> &'static str {
        match self {
            Phase::None => "none",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::error::TriadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Phase::None),
            "define" => Ok(Phase::Define),
            "design" => Ok(Phase::Design),
            "deliver" => Ok(Phase::Deliver),
            _ => Err(crate::error::TriadError::InvalidPhase(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
