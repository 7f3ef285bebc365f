//! Application services for parsing, prompting and running conversation
//! turns.

mod bus;
mod orchestrator;
mod parser;
mod prompt;
mod registry;
mod session;

pub use bus::ProgressBus;
pub use orchestrator::ConversationOrchestrator;
pub use parser::parse_tool_calls;
pub use prompt::{PromptRenderError, TOOL_USE_PROTOCOL, build_system_prompt, render_tool_listing};
pub use registry::{ResponseRegistry, UpsertOutcome};
pub use session::{
    ChatOptions, ChatSession, ChatSessionError, ChatSessionResult, NO_SERVERS_MESSAGE,
};
