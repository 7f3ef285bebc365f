//! Latest-state log of tool response records.

use crate::conversation::{
    domain::{ProgressEvent, ToolResponseRecord},
    ports::ProgressObserver,
};

/// What an upsert did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The record was appended.
    Inserted,
    /// An existing record with the same id was replaced in place.
    Replaced,
}

/// Ordered records keyed by id, one entry per id.
///
/// Lookups are linear; per-round call counts are small.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseRegistry {
    records: Vec<ToolResponseRecord>,
}

impl ResponseRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Inserts `record`, or replaces the record with the same id without
    /// moving it.
    ///
    /// When `sink` is supplied it receives a status line and the record
    /// after the mutation.
    pub fn upsert(
        &mut self,
        record: ToolResponseRecord,
        sink: Option<&dyn ProgressObserver>,
    ) -> UpsertOutcome {
        let position = self
            .records
            .iter()
            .position(|existing| existing.id == record.id);
        let (outcome, index) = match position {
            Some(index) => {
                if let Some(slot) = self.records.get_mut(index) {
                    *slot = record;
                }
                (UpsertOutcome::Replaced, index)
            }
            None => {
                self.records.push(record);
                (UpsertOutcome::Inserted, self.records.len().saturating_sub(1))
            }
        };

        if let (Some(observer), Some(stored)) = (sink, self.records.get(index)) {
            let event = match outcome {
                UpsertOutcome::Inserted => ProgressEvent::tool_call_started(stored),
                UpsertOutcome::Replaced => ProgressEvent::tool_call_updated(stored),
            };
            observer.on_event(&event);
        }
        outcome
    }

    /// Returns the record with `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ToolResponseRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Returns every record in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ToolResponseRecord] {
        &self.records
    }

    /// Consumes the registry, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<ToolResponseRecord> {
        self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no record is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
