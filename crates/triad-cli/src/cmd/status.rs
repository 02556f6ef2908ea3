use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use triad_core::Project;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let project = Project::open(root).context("failed to open project")?;
    let status = project.status().context("failed to read status")?;

    if json {
        return print_json(&status);
    }

    if !status.initialized {
        println!("Not initialized (run 'triad init')");
        return Ok(());
    }
    match &status.feature {
        Some(name) => {
            println!("Feature: {name}");
            println!("Phase:   {}", status.phase.label());
        }
        None => println!("No active feature"),
    }
    Ok(())
}
