//! Fan-out of progress events to subscribed observers.

use crate::conversation::{domain::ProgressEvent, ports::ProgressObserver};
use std::sync::{Arc, PoisonError, RwLock};

/// Broadcasts every published event to all subscribers, synchronously and
/// in subscription order.
#[derive(Default)]
pub struct ProgressBus {
    observers: RwLock<Vec<Arc<dyn ProgressObserver>>>,
}

impl ProgressBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    pub fn subscribe(&self, observer: Arc<dyn ProgressObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Returns the number of subscribed observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ProgressObserver for ProgressBus {
    fn on_event(&self, event: &ProgressEvent) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.on_event(event);
        }
    }
}

impl std::fmt::Debug for ProgressBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
