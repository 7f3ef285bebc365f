//! Progress records for dispatched tool calls.

use crate::tool_registry::domain::{ContentItem, ToolCallIntent, ToolCallResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error text recorded when a tool call comes back error-flagged.
pub const TOOL_CALL_FAILED: &str = "tool call failed";

/// Lifecycle state of a tool response record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolResponseStatus {
    /// The call has been issued and has not finished.
    Invoking,
    /// The call finished successfully.
    Done,
    /// The call finished with an error-flagged response.
    Error,
}

impl ToolResponseStatus {
    /// Returns the lowercase status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoking => "invoking",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ToolResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known state of one dispatched tool call.
///
/// Records are identified by `id`; a newer record with the same id
/// supersedes the older one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponseRecord {
    /// Record identifier, unique within one registry.
    pub id: String,
    /// Intent that started the call.
    pub intent: ToolCallIntent,
    /// Current status.
    pub status: ToolResponseStatus,
    /// Canonical content of the response, once available.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentItem>,
    /// Error text, for failed calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResponseRecord {
    /// Creates a record for a call that has just been issued.
    #[must_use]
    pub fn invoking(id: impl Into<String>, intent: ToolCallIntent) -> Self {
        Self {
            id: id.into(),
            intent,
            status: ToolResponseStatus::Invoking,
            content: Vec::new(),
            error: None,
        }
    }

    /// Creates the terminal record for a finished call.
    #[must_use]
    pub fn finished(
        id: impl Into<String>,
        intent: ToolCallIntent,
        response: &ToolCallResponse,
    ) -> Self {
        let (status, error) = if response.is_error() {
            (ToolResponseStatus::Error, Some(TOOL_CALL_FAILED.to_owned()))
        } else {
            (ToolResponseStatus::Done, None)
        };
        Self {
            id: id.into(),
            intent,
            status,
            content: response.content().to_vec(),
            error,
        }
    }

    /// Returns the name of the called tool.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.intent.name
    }
}
