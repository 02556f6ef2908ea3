use crate::output::print_outcome;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use triad_core::Project;

#[derive(Subcommand)]
pub enum PhaseSubcommand {
    /// Move the active feature to a phase (define, design, deliver)
    Set { phase: String },
    /// Move the active feature to the following phase
    Next,
}

pub fn run(root: &Path, subcmd: PhaseSubcommand, json: bool) -> anyhow::Result<()> {
    let mut project = Project::open(root).context("failed to open project")?;
    let outcome = match subcmd {
        PhaseSubcommand::Set { phase } => project
            .change_phase(&phase)
            .with_context(|| format!("failed to change phase to '{phase}'"))?,
        PhaseSubcommand::Next => project.advance_phase().context("failed to advance phase")?,
    };
    print_outcome(&outcome, json)
}
