//! DeleteObjective command handler.
//!
//! Ownership-checked delete. The handler issues a single objective delete
//! and trusts the store's referential-integrity configuration to cascade to
//! key results and their history; it does not re-implement recursive
//! deletion.

use crate::domain::foundation::{ObjectiveId, UserId};
use crate::ports::ObjectiveRepository;
use std::sync::Arc;
use thiserror::Error;

/// Command to delete an objective.
#[derive(Debug, Clone)]
pub struct DeleteObjectiveCommand {
    /// The objective to delete.
    pub objective_id: ObjectiveId,
    /// The caller; must own the objective.
    pub owner: UserId,
}

/// Errors that can occur when deleting an objective.
#[derive(Debug, Clone, Error)]
pub enum DeleteObjectiveError {
    /// No objective exists with the given id.
    #[error("Objective not found: {0}")]
    NotFound(ObjectiveId),

    /// The objective exists but belongs to a different owner.
    #[error("Forbidden: caller does not own this objective")]
    Forbidden,

    /// The store failed the read or the delete.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for DeleteObjective commands.
pub struct DeleteObjectiveHandler<O>
where
    O: ObjectiveRepository,
{
    objectives: Arc<O>,
}

impl<O> DeleteObjectiveHandler<O>
where
    O: ObjectiveRepository,
{
    /// Creates a new handler with the given dependency.
    pub fn new(objectives: Arc<O>) -> Self {
        Self { objectives }
    }

    /// Handles a delete objective command.
    pub async fn handle(&self, cmd: DeleteObjectiveCommand) -> Result<(), DeleteObjectiveError> {
        let objective = self
            .objectives
            .find_by_id(&cmd.objective_id)
            .await
            .map_err(|e| DeleteObjectiveError::Store(e.to_string()))?
            .ok_or(DeleteObjectiveError::NotFound(cmd.objective_id))?;

        objective
            .authorize(&cmd.owner)
            .map_err(|_| DeleteObjectiveError::Forbidden)?;

        let deleted = self
            .objectives
            .delete(&cmd.objective_id)
            .await
            .map_err(|e| DeleteObjectiveError::Store(e.to_string()))?;
        if !deleted {
            // The row vanished between the read and the delete.
            return Err(DeleteObjectiveError::NotFound(cmd.objective_id));
        }

        Ok(())
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
    use crate::ports::{KeyResultRepository, ProgressHistoryRepository};

    fn owner() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    async fn seed(store: &Arc<InMemoryStore>) -> crate::domain::goal::ObjectiveWithKeyResults {
        let handler = CreateObjectiveHandler::new(store.clone(), store.clone());
        handler
            .handle(CreateObjectiveCommand {
                owner: owner(),
                title: "Learn Rust".to_string(),
                description: "All of it".to_string(),
                category: String::new(),
                priority: Priority::Low,
                target_date: None,
                key_results: vec![KeyResultSpec {
                    title: "Sessions".to_string(),
                    description: String::new(),
                    metric_kind: MetricKind::Number,
                    target_value: 10.0,
                    current_value: 0.0,
                }],
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let store = Arc::new(InMemoryStore::new());
        let created = seed(&store).await;
        let handler = DeleteObjectiveHandler::new(store.clone());

        handler
            .handle(DeleteObjectiveCommand {
                objective_id: *created.objective.id(),
                owner: owner(),
            })
            .await
            .unwrap();

        let remaining = ObjectiveRepository::find_by_id(store.as_ref(), created.objective.id())
            .await
            .unwrap();
        assert!(remaining.is_none());
    }

    #[tokio::test]
    async fn delete_cascades_to_key_results_and_history() {
        let store = Arc::new(InMemoryStore::new());
        let created = seed(&store).await;
        let kr_id = *created.key_results[0].id();

        // Leave an audit entry behind the key result
        let update = UpdateProgressHandler::new(store.clone(), store.clone());
        update
            .handle(UpdateProgressCommand {
                key_result_id: kr_id,
                new_current_value: 5.0,
                note: Some("halfway".to_string()),
                actor: owner(),
            })
            .await
            .unwrap();

        let handler = DeleteObjectiveHandler::new(store.clone());
        handler
            .handle(DeleteObjectiveCommand {
                objective_id: *created.objective.id(),
                owner: owner(),
            })
            .await
            .unwrap();

        assert!(KeyResultRepository::find_by_id(store.as_ref(), &kr_id)
            .await
            .unwrap()
            .is_none());
        assert!(store.find_by_key_result(&kr_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_objective_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let handler = DeleteObjectiveHandler::new(store.clone());

        let result = handler
            .handle(DeleteObjectiveCommand {
                objective_id: ObjectiveId::new(),
                owner: owner(),
            })
            .await;

        assert!(matches!(result, Err(DeleteObjectiveError::NotFound(_))));
    }

    #[tokio::test]
    async fn other_owner_is_forbidden_and_nothing_is_deleted() {
        let store = Arc::new(InMemoryStore::new());
        let created = seed(&store).await;
        let handler = DeleteObjectiveHandler::new(store.clone());

        let result = handler
            .handle(DeleteObjectiveCommand {
                objective_id: *created.objective.id(),
                owner: UserId::new("intruder").unwrap(),
            })
            .await;

        assert!(matches!(result, Err(DeleteObjectiveError::Forbidden)));
        let still_there = ObjectiveRepository::find_by_id(store.as_ref(), created.objective.id())
            .await
            .unwrap();
        assert!(still_there.is_some());
    }
}
