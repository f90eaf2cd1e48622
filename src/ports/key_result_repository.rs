//! Key result repository port.
//!
//! Row-level CRUD against the `key_results` collection. Key results are
//! never deleted through this port; removal happens only via the objective
//! cascade.

use crate::domain::foundation::{KeyResultId, ObjectiveId};
use crate::domain::goal::KeyResult;
use async_trait::async_trait;

use super::StoreError;

/// Repository port for KeyResult persistence.
#[async_trait]
pub trait KeyResultRepository: Send + Sync {
    /// Insert a new key result row.
    async fn insert(&self, key_result: &KeyResult) -> Result<(), StoreError>;

    /// Find a key result by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &KeyResultId) -> Result<Option<KeyResult>, StoreError>;

    /// Find all key results for an objective, in creation order.
    async fn find_by_objective(
        &self,
        objective_id: &ObjectiveId,
    ) -> Result<Vec<KeyResult>, StoreError>;

    /// Update an existing key result row.
    ///
    /// Returns false if no row matched the id.
    async fn update(&self, key_result: &KeyResult) -> Result<bool, StoreError>;
}
