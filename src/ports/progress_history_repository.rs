//! Progress history repository port.
//!
//! Append-only access to the `progress_history` collection. Entries are
//! never updated or deleted by normal flows; only the objective cascade
//! removes them.

use crate::domain::foundation::KeyResultId;
use crate::domain::goal::ProgressHistoryEntry;
use async_trait::async_trait;

use super::StoreError;

/// Repository port for the progress audit trail.
#[async_trait]
pub trait ProgressHistoryRepository: Send + Sync {
    /// Append an entry to the audit trail.
    async fn append(&self, entry: &ProgressHistoryEntry) -> Result<(), StoreError>;

    /// Find all entries for a key result, oldest first.
    async fn find_by_key_result(
        &self,
        key_result_id: &KeyResultId,
    ) -> Result<Vec<ProgressHistoryEntry>, StoreError>;
}
