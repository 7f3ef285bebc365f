//! Port contracts for the completion backend and progress consumers.

mod completion;
mod progress;

pub use completion::{
    Completion, CompletionMessage, CompletionRequest, ModelCompletion, ModelCompletionError,
    ModelCompletionResult,
};
pub use progress::ProgressObserver;
