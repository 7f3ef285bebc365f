//! Progress observer port.

use crate::conversation::domain::ProgressEvent;

/// Receives progress events while a conversation turn runs.
///
/// Observers are called synchronously from the publishing task and should
/// return quickly.
pub trait ProgressObserver: Send + Sync {
    /// Handles one event.
    fn on_event(&self, event: &ProgressEvent);
}
