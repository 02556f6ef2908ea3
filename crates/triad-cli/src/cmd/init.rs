use crate::output::print_outcome;
use anyhow::Context;
use std::path::Path;
use triad_core::Project;

pub fn run(root: &Path, clean: bool, json: bool) -> anyhow::Result<()> {
    let mut project = Project::open_for_init(root).context("failed to open project")?;
    let outcome = project
        .init(clean)
        .with_context(|| format!("failed to initialize {}", root.display()))?;
    print_outcome(&outcome, json)?;

    if !json && outcome.guidance_changed {
        let files = project.config().guidance.files.join(", ");
        println!("  guidance: {files}");
        println!("Next: triad feature create <name>");
    }
    Ok(())
}
