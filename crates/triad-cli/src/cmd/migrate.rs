use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use triad_core::migrations;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let migrated =
        migrations::migrate_legacy_session(root).context("failed to migrate session record")?;

    if json {
        print_json(&serde_json::json!({ "migrated": migrated }))?;
    } else if migrated {
        println!("Session record converted to the current layout");
    } else {
        println!("Nothing to migrate");
    }
    Ok(())
}
