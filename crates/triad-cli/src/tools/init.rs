use super::{parse_args, to_value, TriadTool};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use triad_core::Project;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InitArgs {
    #[serde(default)]
    clean: bool,
}

pub struct InitTool;

impl TriadTool for InitTool {
    fn name(&self) -> &str {
        "triad_init"
    }

    fn description(&self) -> &str {
        "Initialize triad in the project. With clean=true, remove every feature and the session and start over"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "clean": {
                    "type": "boolean",
                    "description": "Wipe all triad state before initializing",
                    "default": false
                }
            },
            "required": [],
            "additionalProperties": false
        })
    }

    fn call(&self, args: Value, root: &Path) -> Result<Value, String> {
        let req: InitArgs = parse_args(args)?;
        let mut project = Project::open_for_init(root).map_err(|e| e.to_string())?;
        let outcome = project.init(req.clean).map_err(|e| e.to_string())?;
        to_value(&outcome)
    }
}
