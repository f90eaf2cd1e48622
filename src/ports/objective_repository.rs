//! Objective repository port.
//!
//! Row-level CRUD against the `objectives` collection. Implementations own
//! no business logic; aggregate progress in particular is never written
//! here, it is always recomputed from key results.

use crate::domain::foundation::{ObjectiveId, UserId};
use crate::domain::goal::Objective;
use async_trait::async_trait;

use super::StoreError;

/// Repository port for Objective persistence.
///
/// Implementations must ensure:
/// - Deleting an objective cascades to its key results and their history
///   (referential-integrity configuration, not engine logic)
#[async_trait]
pub trait ObjectiveRepository: Send + Sync {
    /// Insert a new objective row.
    async fn insert(&self, objective: &Objective) -> Result<(), StoreError>;

    /// Find an objective by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ObjectiveId) -> Result<Option<Objective>, StoreError>;

    /// Find all objectives owned by a user, most recently updated first.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Objective>, StoreError>;

    /// Update an existing objective row.
    ///
    /// Returns false if no row matched the id.
    async fn update(&self, objective: &Objective) -> Result<bool, StoreError>;

    /// Delete an objective row, cascading to key results and history.
    ///
    /// Returns false if no row matched the id.
    async fn delete(&self, id: &ObjectiveId) -> Result<bool, StoreError>;
}
