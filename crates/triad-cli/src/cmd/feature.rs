use crate::output::{print_json, print_outcome, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use triad_core::Project;

#[derive(Subcommand)]
pub enum FeatureSubcommand {
    /// Create a feature and make it active in the define phase
    Create { name: String },
    /// Make an existing feature active, restoring its phase
    Enter { name: String },
    /// Leave the active feature
    Exit,
    /// List all features
    List,
}

pub fn run(root: &Path, subcmd: FeatureSubcommand, json: bool) -> anyhow::Result<()> {
    let mut project = Project::open(root).context("failed to open project")?;
    match subcmd {
        FeatureSubcommand::Create { name } => {
            let outcome = project
                .create_feature(&name)
                .with_context(|| format!("failed to create feature '{name}'"))?;
            print_outcome(&outcome, json)
        }
        FeatureSubcommand::Enter { name } => {
            let outcome = project
                .enter_feature(&name)
                .with_context(|| format!("failed to enter feature '{name}'"))?;
            print_outcome(&outcome, json)
        }
        FeatureSubcommand::Exit => {
            let outcome = project.exit_feature().context("failed to exit feature")?;
            print_outcome(&outcome, json)
        }
        FeatureSubcommand::List => list(&project, json),
    }
}

fn list(project: &Project, json: bool) -> anyhow::Result<()> {
    let features = project.list_features().context("failed to list features")?;

    if json {
        return print_json(&features);
    }
    if features.is_empty() {
        println!("No features. Create one with: triad feature create <name>");
        return Ok(());
    }

    let active = project.current_feature();
    let rows = features
        .iter()
        .map(|f| {
            vec![
                if active == Some(f.name.as_str()) { "*" } else { "" }.to_string(),
                f.name.clone(),
                f.phase.label().to_string(),
                f.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["", "NAME", "PHASE", "UPDATED"], rows);
    Ok(())
}
