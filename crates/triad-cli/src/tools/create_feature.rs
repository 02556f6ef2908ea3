use super::{feature_schema, parse_args, to_value, FeatureArgs, TriadTool};
use serde_json::Value;
use std::path::Path;

pub struct CreateFeatureTool;

impl TriadTool for CreateFeatureTool {
    fn name(&self) -> &str {
        "triad_create_feature"
    }

    fn description(&self) -> &str {
        "Create a feature and make it the active one, starting in the define phase"
    }

    fn schema(&self) -> Value {
        feature_schema("Feature name: lowercase letters, digits and hyphens")
    }

    fn call(&self, args: Value, root: &Path) -> Result<Value, String> {
        let req: FeatureArgs = parse_args(args)?;
        let mut project = super::open(root)?;
        let outcome = project.create_feature(&req.name).map_err(|e| e.to_string())?;
        to_value(&outcome)
    }
}
