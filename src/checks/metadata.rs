use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value as JsonValue;

use super::CheckOutcome;
use super::file_label;

/// Parsed agent descriptor.
///
/// Known keys are typed fields so presence can be checked without string
/// lookups; everything else lands in `extra`. Values stay as raw JSON because
/// type checks (e.g. `tools` must be an array) are findings, not parse errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<JsonValue>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<JsonValue>,
    #[serde(default, deserialize_with = "present")]
    pub tools: Option<JsonValue>,
    #[serde(default, rename = "displayName", deserialize_with = "present")]
    pub display_name: Option<JsonValue>,
    #[serde(default, deserialize_with = "present")]
    pub author: Option<JsonValue>,
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`: the key is present.
fn present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

impl MetadataDocument {
    /// Parse a JSON object. A key that appears more than once keeps its last
    /// value.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let object: Map<String, JsonValue> = serde_json::from_str(contents)?;
        serde_json::from_value(JsonValue::Object(object))
    }

    fn required_fields(&self) -> [(&'static str, bool); 3] {
        [
            ("name", self.name.is_some()),
            ("description", self.description.is_some()),
            ("tools", self.tools.is_some()),
        ]
    }

    fn recommended_fields(&self) -> [(&'static str, bool); 3] {
        [
            ("displayName", self.display_name.is_some()),
            ("author", self.author.is_some()),
            ("tags", self.tags.is_some()),
        ]
    }
}

/// Check the metadata document at `path` for an agent named `agent_name`.
///
/// A missing or unparsable document stops the check with a single error.
/// Otherwise all field errors are collected, followed by warnings for absent
/// recommended fields.
pub fn validate_metadata(path: &Path, agent_name: &str) -> CheckOutcome {
    let file_name = file_label(path);

    if !path.exists() {
        return CheckOutcome::failed(format!("{file_name} is missing"));
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => return CheckOutcome::failed(format!("{file_name} could not be read: {e}")),
    };

    let document = match MetadataDocument::parse(&contents) {
        Ok(document) => document,
        Err(e) => return CheckOutcome::failed(format!("{file_name} is not valid JSON: {e}")),
    };

    let mut outcome = CheckOutcome::new();

    for (field, is_present) in document.required_fields() {
        if !is_present {
            outcome.add_error(format!("{file_name} missing required field: '{field}'"));
        }
    }

    if let Some(name) = &document.name {
        let name_str = name.as_str();
        if name_str != Some(agent_name) {
            let shown = name_str.map_or_else(|| name.to_string(), str::to_string);
            outcome.add_error(format!(
                "{file_name} 'name' field ('{shown}') does not match directory name ('{agent_name}')"
            ));
        }
        if name_str.is_some_and(|n| n.contains(' ')) {
            outcome.add_error(format!(
                "{file_name} 'name' field contains spaces (should be snake_case)"
            ));
        }
    }

    if document.tools.as_ref().is_some_and(|tools| !tools.is_array()) {
        outcome.add_error(format!("{file_name} 'tools' field must be an array"));
    }

    for (field, is_present) in document.recommended_fields() {
        if !is_present {
            outcome.add_warning(format!("{file_name} missing recommended field: '{field}'"));
        }
    }

    outcome
}
