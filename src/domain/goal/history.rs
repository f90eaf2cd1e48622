//! Progress history entries.
//!
//! History entries are immutable audit records of key result value changes.
//! They are appended when an update carries a note and are never updated or
//! deleted by normal flows; only an objective cascade removes them.

use crate::domain::foundation::{HistoryEntryId, KeyResultId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// An immutable record of one key result value change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressHistoryEntry {
    /// Unique identifier for this entry.
    id: HistoryEntryId,

    /// The key result whose value changed.
    key_result_id: KeyResultId,

    /// Value before the change.
    previous_value: f64,

    /// Value after the change.
    new_value: f64,

    /// Free-text note supplied with the update.
    note: Option<String>,

    /// User who made the change.
    actor: UserId,

    /// When the change was recorded.
    recorded_at: Timestamp,
}

impl ProgressHistoryEntry {
    /// Creates a new history entry for a value change.
    pub fn new(
        key_result_id: KeyResultId,
        previous_value: f64,
        new_value: f64,
        note: Option<String>,
        actor: UserId,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            key_result_id,
            previous_value,
            new_value,
            note,
            actor,
            recorded_at: Timestamp::now(),
        }
    }

    /// Reconstitutes an entry from persistence.
    pub fn reconstitute(
        id: HistoryEntryId,
        key_result_id: KeyResultId,
        previous_value: f64,
        new_value: f64,
        note: Option<String>,
        actor: UserId,
        recorded_at: Timestamp,
    ) -> Self {
        Self {
            id,
            key_result_id,
            previous_value,
            new_value,
            note,
            actor,
            recorded_at,
        }
    }

    /// Returns the entry ID.
    pub fn id(&self) -> &HistoryEntryId {
        &self.id
    }

    /// Returns the key result this entry belongs to.
    pub fn key_result_id(&self) -> &KeyResultId {
        &self.key_result_id
    }

    /// Returns the value before the change.
    pub fn previous_value(&self) -> f64 {
        self.previous_value
    }

    /// Returns the value after the change.
    pub fn new_value(&self) -> f64 {
        self.new_value
    }

    /// Returns the note, if one was supplied.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the user who made the change.
    pub fn actor(&self) -> &UserId {
        &self.actor
    }

    /// Returns when the change was recorded.
    pub fn recorded_at(&self) -> &Timestamp {
        &self.recorded_at
    }
}
