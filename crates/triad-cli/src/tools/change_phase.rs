use super::{parse_args, to_value, TriadTool};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangePhaseArgs {
    phase: String,
}

pub struct ChangePhaseTool;

impl TriadTool for ChangePhaseTool {
    fn name(&self) -> &str {
        "triad_change_phase"
    }

    fn description(&self) -> &str {
        "Move the active feature to another phase. Any phase may be targeted; \
         the result carries impact=true when the target phase already has work"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "phase": {
                    "type": "string",
                    "enum": ["define", "design", "deliver"],
                    "description": "Target phase"
                }
            },
            "required": ["phase"],
            "additionalProperties": false
        })
    }

    fn call(&self, args: Value, root: &Path) -> Result<Value, String> {
        let req: ChangePhaseArgs = parse_args(args)?;
        let mut project = super::open(root)?;
        let outcome = project.change_phase(&req.phase).map_err(|e| e.to_string())?;
        to_value(&outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use triad_core::Project;

    fn active(dir: &TempDir) {
        let mut p = Project::open(dir.path()).unwrap();
        p.init(false).unwrap();
        p.create_feature("checkout").unwrap();
    }

    #[test]
    fn returning_to_a_worked_phase_reports_impact() {
        let dir = TempDir::new().unwrap();
        active(&dir);

        let forward = ChangePhaseTool
            .call(serde_json::json!({"phase": "design"}), dir.path())
            .unwrap();
        assert!(forward.get("impact").is_none());

        let back = ChangePhaseTool
            .call(serde_json::json!({"phase": "define"}), dir.path())
            .unwrap();
        assert_eq!(back["impact"], true);
    }

    #[test]
    fn unknown_phase_is_an_error() {
        let dir = TempDir::new().unwrap();
        active(&dir);
        let err = ChangePhaseTool
            .call(serde_json::json!({"phase": "shipping"}), dir.path())
            .unwrap_err();
        assert!(err.contains("invalid phase 'shipping'"));
    }

    #[test]
    fn phase_is_required() {
        let dir = TempDir::new().unwrap();
        active(&dir);
        assert!(ChangePhaseTool.call(Value::Null, dir.path()).is_err());
    }
}
