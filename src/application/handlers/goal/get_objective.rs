//! GetObjective query handler.
//!
//! Fetches an objective with its key results and the computed rollup. This
//! is the read half of the progress-update contract: after a key result
//! changes, callers come back through here for the fresh aggregate instead
//! of trusting a stored number.

use crate::domain::foundation::{ObjectiveId, UserId};
use crate::domain::goal::ObjectiveWithKeyResults;
use crate::ports::{KeyResultRepository, ObjectiveRepository};
use std::sync::Arc;
use thiserror::Error;

/// Query for one objective and its key results.
#[derive(Debug, Clone)]
pub struct GetObjectiveQuery {
    /// The objective to fetch.
    pub objective_id: ObjectiveId,
    /// The caller; must own the objective.
    pub owner: UserId,
}

/// Errors that can occur when fetching an objective.
#[derive(Debug, Clone, Error)]
pub enum GetObjectiveError {
    /// No objective exists with the given id.
    #[error("Objective not found: {0}")]
    NotFound(ObjectiveId),

    /// The objective exists but belongs to a different owner.
    #[error("Forbidden: caller does not own this objective")]
    Forbidden,

    /// The store failed a read.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for GetObjective queries.
pub struct GetObjectiveHandler<O, K>
where
    O: ObjectiveRepository,
    K: KeyResultRepository,
{
    objectives: Arc<O>,
    key_results: Arc<K>,
}

impl<O, K> GetObjectiveHandler<O, K>
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

    /// Handles a get objective query.
    pub async fn handle(
        &self,
        query: GetObjectiveQuery,
    ) -> Result<ObjectiveWithKeyResults, GetObjectiveError> {
        let objective = self
            .objectives
            .find_by_id(&query.objective_id)
            .await
            .map_err(|e| GetObjectiveError::Store(e.to_string()))?
            .ok_or(GetObjectiveError::NotFound(query.objective_id))?;

        objective
            .authorize(&query.owner)
            .map_err(|_| GetObjectiveError::Forbidden)?;

        let key_results = self
            .key_results
            .find_by_objective(&query.objective_id)
            .await
            .map_err(|e| GetObjectiveError::Store(e.to_string()))?;

        Ok(ObjectiveWithKeyResults::new(objective, key_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::goal::{
        CreateObjectiveCommand, CreateObjectiveHandler, UpdateProgressCommand,
        UpdateProgressHandler,
    };
    use crate::domain::goal::{KeyResultSpec, MetricKind, Priority};

    fn owner() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    fn spec(target: f64) -> KeyResultSpec {
        KeyResultSpec {
            title: "Sessions".to_string(),
            description: String::new(),
            metric_kind: MetricKind::Number,
            target_value: target,
            current_value: 0.0,
        }
    }

    async fn seed(store: &Arc<InMemoryStore>, specs: Vec<KeyResultSpec>) -> ObjectiveWithKeyResults {
        let handler = CreateObjectiveHandler::new(store.clone(), store.clone());
        handler
            .handle(CreateObjectiveCommand {
                owner: owner(),
                title: "Learn Rust".to_string(),
                description: "All of it".to_string(),
                category: "programming".to_string(),
                priority: Priority::Medium,
                target_date: None,
                key_results: specs,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn returns_objective_with_rollup() {
        let store = Arc::new(InMemoryStore::new());
        let created = seed(&store, vec![spec(10.0), spec(10.0)]).await;
        let handler = GetObjectiveHandler::new(store.clone(), store.clone());

        let fetched = handler
            .handle(GetObjectiveQuery {
                objective_id: *created.objective.id(),
                owner: owner(),
            })
            .await
            .unwrap();

        assert_eq!(fetched.key_results.len(), 2);
        assert_eq!(fetched.progress().value(), 0);
    }

    #[tokio::test]
    async fn rollup_reflects_progress_updates() {
        let store = Arc::new(InMemoryStore::new());
        let created = seed(&store, vec![spec(10.0), spec(10.0)]).await;

        // Move one key result to completion
        let update = UpdateProgressHandler::new(store.clone(), store.clone());
        update
            .handle(UpdateProgressCommand {
                key_result_id: *created.key_results[0].id(),
                new_current_value: 10.0,
                note: None,
                actor: owner(),
            })
            .await
            .unwrap();

        let handler = GetObjectiveHandler::new(store.clone(), store.clone());
        let fetched = handler
            .handle(GetObjectiveQuery {
                objective_id: *created.objective.id(),
                owner: owner(),
            })
            .await
            .unwrap();

        // Mean of 100 and 0
        assert_eq!(fetched.progress().value(), 50);
    }

    #[tokio::test]
    async fn unknown_objective_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let handler = GetObjectiveHandler::new(store.clone(), store.clone());

        let missing = ObjectiveId::new();
        let result = handler
            .handle(GetObjectiveQuery {
                objective_id: missing,
                owner: owner(),
            })
            .await;

        assert!(matches!(result, Err(GetObjectiveError::NotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn other_owner_is_forbidden() {
        let store = Arc::new(InMemoryStore::new());
        let created = seed(&store, Vec::new()).await;
        let handler = GetObjectiveHandler::new(store.clone(), store.clone());

        let result = handler
            .handle(GetObjectiveQuery {
                objective_id: *created.objective.id(),
                owner: UserId::new("intruder").unwrap(),
            })
            .await;

        assert!(matches!(result, Err(GetObjectiveError::Forbidden)));
    }
}
