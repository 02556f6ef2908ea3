use super::{empty_schema, parse_args, NoArgs, TriadTool};
use serde_json::Value;
use std::path::Path;

pub struct ListFeaturesTool;

impl TriadTool for ListFeaturesTool {
    fn name(&self) -> &str {
        "triad_list_features"
    }

    fn description(&self) -> &str {
        "List every feature with its current phase, marking the active one"
    }

    fn schema(&self) -> Value {
        empty_schema()
    }

    fn call(&self, args: Value, root: &Path) -> Result<Value, String> {
        let _: NoArgs = parse_args(args)?;
        let project = super::open(root)?;
        let features = project.list_features().map_err(|e| e.to_string())?;
        let active = project.current_feature();

        let list: Vec<Value> = features
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name,
                    "phase": f.phase,
                    "active": active == Some(f.name.as_str()),
                    "created_at": f.created_at,
                    "updated_at": f.updated_at,
                })
            })
            .collect();
        Ok(serde_json::json!({ "features": list }))
    }
}
