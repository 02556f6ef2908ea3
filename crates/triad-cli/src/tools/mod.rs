use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use triad_core::Project;

pub mod change_phase;
pub mod create_feature;
pub mod enter_feature;
pub mod exit_feature;
pub mod init;
pub mod list_features;
pub mod status;

pub trait TriadTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> Value;
    fn call(&self, args: Value, root: &Path) -> Result<Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn TriadTool>> {
    vec![
        Box::new(init::InitTool),
        Box::new(create_feature::CreateFeatureTool),
        Box::new(enter_feature::EnterFeatureTool),
        Box::new(change_phase::ChangePhaseTool),
        Box::new(exit_feature::ExitFeatureTool),
        Box::new(status::StatusTool),
        Box::new(list_features::ListFeaturesTool),
    ]
}

/// Decode tool arguments into a request struct. Absent arguments are
/// treated as an empty object.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| format!("invalid arguments: {e}"))
}

pub(crate) fn open(root: &Path) -> Result<Project, String> {
    Project::open(root).map_err(|e| e.to_string())
}

pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Request with no fields; anything supplied is rejected.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NoArgs {}

/// Request naming a single feature.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FeatureArgs {
    pub name: String,
}

pub(crate) fn feature_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "name": {
                "type": "string",
                "description": description
            }
        },
        "required": ["name"],
        "additionalProperties": false
    })
}

pub(crate) fn empty_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "required": [],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_arguments_read_as_empty() {
        let _: NoArgs = parse_args(Value::Null).unwrap();
    }

    #[test]
    fn missing_and_mistyped_fields_are_rejected() {
        assert!(parse_args::<FeatureArgs>(serde_json::json!({})).is_err());
        assert!(parse_args::<FeatureArgs>(serde_json::json!({"name": 7})).is_err());
        let err = parse_args::<NoArgs>(serde_json::json!({"extra": true})).unwrap_err();
        assert!(err.starts_with("invalid arguments"));
    }

    #[test]
    fn tool_names_are_unique() {
        let tools = all_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }
}
