//! UpdateKeyResultProgress command handler.
//!
//! Records a new current value on a key result, recomputes its derived
//! progress, and appends an audit entry when the update carries a note.
//! History logging is best-effort: value correctness takes priority over
//! audit completeness, so an append failure is logged and swallowed.
//!
//! The owning objective's aggregate is not pushed anywhere from here; it is
//! always recomputed on read, so callers that need the fresh rollup re-read
//! the objective afterwards.

use crate::domain::foundation::{KeyResultId, UserId};
use crate::domain::goal::{KeyResult, ProgressHistoryEntry};
use crate::ports::{KeyResultRepository, ProgressHistoryRepository};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Command to record progress on a key result.
#[derive(Debug, Clone)]
pub struct UpdateProgressCommand {
    /// The key result being updated.
    pub key_result_id: KeyResultId,
    /// The new current value. No upper bound is enforced here; the derived
    /// progress clamps, so over-achievement stays visible in the raw value.
    pub new_current_value: f64,
    /// Optional note; when present, an audit entry is appended.
    pub note: Option<String>,
    /// The user making the change.
    pub actor: UserId,
}

/// Errors that can occur when updating progress.
#[derive(Debug, Clone, Error)]
pub enum UpdateProgressError {
    /// No key result exists with the given id.
    #[error("Key result not found: {0}")]
    NotFound(KeyResultId),

    /// The store failed the read or the value write.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for UpdateProgress commands.
pub struct UpdateProgressHandler<K, H>
where
    K: KeyResultRepository,
    H: ProgressHistoryRepository,
{
    key_results: Arc<K>,
    history: Arc<H>,
}

impl<K, H> UpdateProgressHandler<K, H>
where
    K: KeyResultRepository,
    H: ProgressHistoryRepository,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(key_results: Arc<K>, history: Arc<H>) -> Self {
        Self {
            key_results,
            history,
        }
    }

    /// Handles an update progress command, returning the updated key result.
    pub async fn handle(
        &self,
        cmd: UpdateProgressCommand,
    ) -> Result<KeyResult, UpdateProgressError> {
        let mut key_result = self
            .key_results
            .find_by_id(&cmd.key_result_id)
            .await
            .map_err(|e| UpdateProgressError::Store(e.to_string()))?
            .ok_or(UpdateProgressError::NotFound(cmd.key_result_id))?;

        let previous_value = key_result.record_progress(cmd.new_current_value);

        let updated = self
            .key_results
            .update(&key_result)
            .await
            .map_err(|e| UpdateProgressError::Store(e.to_string()))?;
        if !updated {
            // The row vanished between read and write (objective cascade).
            return Err(UpdateProgressError::NotFound(cmd.key_result_id));
        }

        if let Some(note) = cmd.note {
            let entry = ProgressHistoryEntry::new(
                cmd.key_result_id,
                previous_value,
                cmd.new_current_value,
                Some(note),
                cmd.actor,
            );
            if let Err(e) = self.history.append(&entry).await {
                warn!(
                    key_result_id = %cmd.key_result_id,
                    error = %e,
                    "failed to append progress history entry; update kept"
                );
            }
        }

        Ok(key_result)
    }
}
