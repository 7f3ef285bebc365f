//! Metadata attached to conversation messages.

use super::{CompletionUsage, TerminationReason};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Message type marker for tool observations.
pub const TOOL_RESULT_MESSAGE_TYPE: &str = "tool_result";

/// Metadata associated with a conversation message.
///
/// Assistant messages carry the model, round and usage of the completion
/// that produced them. Observation messages carry the tool name, error flag
/// and serialised tool response. The final message of a turn records its
/// termination reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Model that produced the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Zero-based round that produced the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<usize>,

    /// Number of tool calls parsed from the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls_detected: Option<usize>,

    /// Token usage of the completion call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,

    /// Why the turn ended, on final messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationReason>,

    /// Failure text, on messages produced by a failed completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Tool that produced an observation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Whether an observed tool call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,

    /// Message type marker, such as [`TOOL_RESULT_MESSAGE_TYPE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,

    /// Serialised tool call response behind an observation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<Value>,

    /// Extension data for custom metadata fields.
    ///
    /// Unknown keys are captured here on deserialisation because of
    /// `#[serde(flatten)]`.
    #[serde(flatten, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, Value>,
}

impl MessageMetadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates metadata describing a completion.
    #[must_use]
    pub fn for_completion(model: impl Into<String>, round: usize, usage: CompletionUsage) -> Self {
        Self {
            model: Some(model.into()),
            round: Some(round),
            usage: Some(usage),
            ..Self::default()
        }
    }

    /// Sets the number of detected tool calls.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "destructors of the owning struct prevent a const builder"
    )]
    pub fn with_tool_calls_detected(mut self, count: usize) -> Self {
        self.tool_calls_detected = Some(count);
        self
    }

    /// Sets the termination reason.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "destructors of the owning struct prevent a const builder"
    )]
    pub fn with_termination(mut self, termination: TerminationReason) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Sets the failure text.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Adds an extension field.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
