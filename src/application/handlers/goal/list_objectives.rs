//! ListObjectives query handler.
//!
//! Lists one user's objectives with their key results and computed rollups,
//! most recently updated first.

use crate::domain::foundation::UserId;
use crate::domain::goal::ObjectiveWithKeyResults;
use crate::ports::{KeyResultRepository, ObjectiveRepository};
use std::sync::Arc;
use thiserror::Error;

/// Query for a user's objectives.
#[derive(Debug, Clone)]
pub struct ListObjectivesQuery {
    /// The caller; only their own objectives come back.
    pub owner: UserId,
}

/// Errors that can occur when listing objectives.
#[derive(Debug, Clone, Error)]
pub enum ListObjectivesError {
    /// The store failed a read.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for ListObjectives queries.
pub struct ListObjectivesHandler<O, K>
where
    O: ObjectiveRepository,
    K: KeyResultRepository,
{
    objectives: Arc<O>,
    key_results: Arc<K>,
}

impl<O, K> ListObjectivesHandler<O, K>
where
    O: ObjectiveRepository,
    K: KeyResultRepository,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(objectives: Arc<O>, key_results: Arc<K>) -> Self {
        Self {
            objectives,
            key_results,
        }
    }

    /// Handles a list objectives query.
    pub async fn handle(
        &self,
        query: ListObjectivesQuery,
    ) -> Result<Vec<ObjectiveWithKeyResults>, ListObjectivesError> {
        let objectives = self
            .objectives
            .find_by_owner(&query.owner)
            .await
            .map_err(|e| ListObjectivesError::Store(e.to_string()))?;

        let mut views = Vec::with_capacity(objectives.len());
        for objective in objectives {
            let key_results = self
                .key_results
                .find_by_objective(objective.id())
                .await
                .map_err(|e| ListObjectivesError::Store(e.to_string()))?;
            views.push(ObjectiveWithKeyResults::new(objective, key_results));
        }

        Ok(views)
    }
}
