//! Tool metadata as reported by a server and as held in a session catalog.

use super::{McpServerDescriptor, McpServerId, ToolId, ToolRegistryDomainError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool entry returned by a server's discovery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredTool {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "empty_schema", rename = "inputSchema")]
    input_schema: Value,
}

fn empty_schema() -> Value {
    Value::Object(Map::new())
}

impl DiscoveredTool {
    /// Creates a discovered tool entry.
    ///
    /// Servers may omit descriptions, so only the name is validated.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyToolName`] when the name is
    /// empty after trimming.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Result<Self, ToolRegistryDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolName);
        }

        Ok(Self {
            name: normalized_name,
            description: description.into().trim().to_owned(),
            input_schema,
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Tool descriptor owned by a session catalog.
///
/// A descriptor remembers the server that exposed it so dispatch can route
/// calls back to that server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpToolDescriptor {
    id: ToolId,
    name: String,
    description: String,
    input_schema: Value,
    server_id: McpServerId,
    server_name: String,
}

impl McpToolDescriptor {
    /// Builds a descriptor for a freshly discovered tool with a new id.
    #[must_use]
    pub fn discovered(tool: DiscoveredTool, server: &McpServerDescriptor) -> Self {
        Self {
            id: ToolId::new(),
            name: tool.name,
            description: tool.description,
            input_schema: tool.input_schema,
            server_id: server.id().clone(),
            server_name: server.name().to_owned(),
        }
    }

    /// Returns the descriptor identifier.
    #[must_use]
    pub const fn id(&self) -> ToolId {
        self.id
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the JSON input schema.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Returns the owning server identifier.
    #[must_use]
    pub const fn server_id(&self) -> &McpServerId {
        &self.server_id
    }

    /// Returns the owning server display name.
    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Returns the declared object properties, in schema order.
    ///
    /// Returns `None` when the schema has no `properties` object. A property
    /// without a declared type is reported as `string`.
    #[must_use]
    pub fn parameters(&self) -> Option<Vec<ToolParameter>> {
        let properties = self.input_schema.get("properties")?.as_object()?;
        let required: Vec<&str> = self
            .input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        Some(
            properties
                .iter()
                .map(|(name, info)| ToolParameter {
                    name: name.clone(),
                    kind: info
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("string")
                        .to_owned(),
                    description: info
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                    required: required.contains(&name.as_str()),
                })
                .collect(),
        )
    }
}

/// One property of a tool's input schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParameter {
    /// Property name.
    pub name: String,
    /// Declared JSON type.
    pub kind: String,
    /// Property description, empty when absent.
    pub description: String,
    /// Whether the schema lists the property as required.
    pub required: bool,
}
