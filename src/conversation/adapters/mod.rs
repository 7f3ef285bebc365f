//! Adapter implementations for the conversation ports.

mod completion;
mod progress;

pub use completion::ScriptedModelCompletion;
pub use progress::{ChannelProgressObserver, RecordingProgressObserver};
