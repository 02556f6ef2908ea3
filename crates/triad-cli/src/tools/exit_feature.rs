use super::{empty_schema, parse_args, to_value, NoArgs, TriadTool};
use serde_json::Value;
use std::path::Path;

pub struct ExitFeatureTool;

impl TriadTool for ExitFeatureTool {
    fn name(&self) -> &str {
        "triad_exit_feature"
    }

    fn description(&self) -> &str {
        "Leave the active feature. Safe to call when nothing is active"
    }

    fn schema(&self) -> Value {
        empty_schema()
    }

    fn call(&self, args: Value, root: &Path) -> Result<Value, String> {
        let _: NoArgs = parse_args(args)?;
        let mut project = super::open(root)?;
        let outcome = project.exit_feature().map_err(|e| e.to_string())?;
        to_value(&outcome)
    }
}
