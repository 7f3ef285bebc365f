//! Domain model for multi-round tool-using conversations.
//!
//! Messages, metadata, tool response records and turn outcomes. These
//! types carry no infrastructure dependencies and are serialisable via
//! serde.

mod ids;
mod message;
mod metadata;
mod outcome;
mod progress;
mod response;
mod role;
mod usage;

pub use ids::MessageId;
pub use message::ConversationMessage;
pub use metadata::{MessageMetadata, TOOL_RESULT_MESSAGE_TYPE};
pub use outcome::{ConversationOutcome, TerminationReason};
pub use progress::{ProgressEvent, ProgressPayload};
pub use response::{TOOL_CALL_FAILED, ToolResponseRecord, ToolResponseStatus};
pub use role::Role;
pub use usage::CompletionUsage;
