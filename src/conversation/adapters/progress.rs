//! Progress observers that record or forward events.

use crate::conversation::{domain::ProgressEvent, ports::ProgressObserver};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

/// Observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingProgressObserver {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgressObserver {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the concatenated status lines of every recorded event.
    #[must_use]
    pub fn transcript(&self) -> String {
        self.events().iter().map(|event| event.text.as_str()).collect()
    }
}

impl ProgressObserver for RecordingProgressObserver {
    fn on_event(&self, event: &ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Observer that forwards events into an unbounded channel.
///
/// Events published after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgressObserver {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelProgressObserver {
    /// Creates an observer and the receiving end of its stream.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressObserver for ChannelProgressObserver {
    fn on_event(&self, event: &ProgressEvent) {
        if self.sender.send(event.clone()).is_err() {
            debug!("progress receiver dropped; discarding event");
        }
    }
}
