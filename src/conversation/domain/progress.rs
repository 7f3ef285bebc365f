//! Events published while a conversation turn runs.

use super::ToolResponseRecord;
use serde::Serialize;

/// A progress notification with a human-readable line and an optional
/// structured payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Status line suitable for streaming to a terminal or log.
    pub text: String,
    /// Structured details, when the event has any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ProgressPayload>,
}

/// Structured part of a [`ProgressEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressPayload {
    /// A tool response record was inserted or replaced.
    ToolResponse {
        /// Latest state of the record.
        record: ToolResponseRecord,
    },
    /// The set of images produced by the current batch grew.
    GeneratedImages {
        /// Every image so far, as `data:` URIs.
        images: Vec<String>,
    },
}

impl ProgressEvent {
    /// Creates an event for a newly tracked tool call.
    #[must_use]
    pub fn tool_call_started(record: &ToolResponseRecord) -> Self {
        Self::for_record(
            format!("[tool call] {}: {}\n", record.tool_name(), record.status),
            record,
        )
    }

    /// Creates an event for an updated tool call.
    #[must_use]
    pub fn tool_call_updated(record: &ToolResponseRecord) -> Self {
        Self::for_record(
            format!("[tool update] {}: {}\n", record.tool_name(), record.status),
            record,
        )
    }

    /// Creates an event carrying the accumulated images of a batch.
    #[must_use]
    pub fn generated_images(images: Vec<String>) -> Self {
        Self {
            text: "\n".to_owned(),
            payload: Some(ProgressPayload::GeneratedImages { images }),
        }
    }

    fn for_record(text: String, record: &ToolResponseRecord) -> Self {
        Self {
            text,
            payload: Some(ProgressPayload::ToolResponse {
                record: record.clone(),
            }),
        }
    }
}
