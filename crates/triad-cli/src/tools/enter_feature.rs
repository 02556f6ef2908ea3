use super::{feature_schema, parse_args, to_value, FeatureArgs, TriadTool};
use serde_json::Value;
use std::path::Path;

pub struct EnterFeatureTool;

impl TriadTool for EnterFeatureTool {
    fn name(&self) -> &str {
        "triad_enter_feature"
    }

    fn description(&self) -> &str {
        "Make an existing feature active, resuming it in the phase it was left in"
    }

    fn schema(&self) -> Value {
        feature_schema("Name of an existing feature")
    }

    fn call(&self, args: Value, root: &Path) -> Result<Value, String> {
        let req: FeatureArgs = parse_args(args)?;
        let mut project = super::open(root)?;
        let outcome = project.enter_feature(&req.name).map_err(|e| e.to_string())?;
        to_value(&outcome)
    }
}
