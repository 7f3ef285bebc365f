//! Parsed, not yet executed, tool call requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool call extracted from generated text.
///
/// The name is not checked against any catalog; unknown names are resolved
/// (and rejected) only at dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallIntent {
    /// Call identifier, unique within one parse pass (`call_0`, `call_1`, ...).
    pub id: String,
    /// Requested tool name.
    pub name: String,
    /// Arguments exactly as the model emitted them.
    pub arguments: Map<String, Value>,
}

impl ToolCallIntent {
    /// Creates a tool call intent.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Returns the arguments without placeholder noise.
    ///
    /// Drops keys whose value is `null`, a blank string or an empty list.
    /// Every other value, including `false`, `0` and `{}`, is kept.
    #[must_use]
    pub fn cleaned_arguments(&self) -> Map<String, Value> {
        self.arguments
            .iter()
            .filter(|(_, value)| !is_placeholder(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn is_placeholder(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => false,
    }
}
