use super::{empty_schema, parse_args, to_value, NoArgs, TriadTool};
use serde_json::Value;
use std::path::Path;

pub struct StatusTool;

impl TriadTool for StatusTool {
    fn name(&self) -> &str {
        "triad_status"
    }

    fn description(&self) -> &str {
        "Report whether the project is initialized and which feature and phase are active"
    }

    fn schema(&self) -> Value {
        empty_schema()
    }

    fn call(&self, args: Value, root: &Path) -> Result<Value, String> {
        let _: NoArgs = parse_args(args)?;
        let status = super::open(root)?.status().map_err(|e| e.to_string())?;
        to_value(&status)
    }
}
