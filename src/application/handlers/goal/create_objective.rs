//! CreateObjective command handler.
//!
//! Creates an objective together with its key results. The store is reached
//! through discrete row operations, so this is a two-step write with a
//! compensating action: if any key result fails after the objective row was
//! written, the handler deletes the just-created objective before returning
//! the error. From the caller's perspective either the whole graph exists or
//! nothing does; the only exception is when the compensating delete itself
//! fails, which is surfaced distinctly as `RollbackFailed` because an orphan
//! objective is left behind.

use crate::domain::foundation::{
    DomainError, KeyResultId, ObjectiveId, Timestamp, UserId,
};
use crate::domain::goal::{
    KeyResult, KeyResultSpec, Objective, ObjectiveWithKeyResults, Priority,
};
use crate::ports::{KeyResultRepository, ObjectiveRepository};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Command to create an objective with its key results.
#[derive(Debug, Clone)]
pub struct CreateObjectiveCommand {
    /// The user creating the objective.
    pub owner: UserId,
    /// Objective title (required, non-empty).
    pub title: String,
    /// Objective description (required, non-empty).
    pub description: String,
    /// Free-form category tag.
    pub category: String,
    /// Owner-assigned priority.
    pub priority: Priority,
    /// Optional target date.
    pub target_date: Option<Timestamp>,
    /// Key results to create alongside the objective. May be empty.
    pub key_results: Vec<KeyResultSpec>,
}

/// Errors that can occur when creating an objective.
#[derive(Debug, Clone, Error)]
pub enum CreateObjectiveError {
    /// Input failed validation; nothing was persisted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store operation failed; any partial write was rolled back.
    #[error("Store error: {0}")]
    Store(String),

    /// The compensating delete failed after a partial write. An orphan
    /// objective row exists and needs operator attention.
    #[error("Rollback failed for objective {objective_id}: {reason}")]
    RollbackFailed {
        objective_id: ObjectiveId,
        reason: String,
    },
}

impl From<DomainError> for CreateObjectiveError {
    fn from(err: DomainError) -> Self {
        CreateObjectiveError::Validation(err.to_string())
    }
}

/// Handler for CreateObjective commands.
pub struct CreateObjectiveHandler<O, K>
where
    O: ObjectiveRepository,
    K: KeyResultRepository,
{
    objectives: Arc<O>,
    key_results: Arc<K>,
}

impl<O, K> CreateObjectiveHandler<O, K>
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

    /// Handles a create objective command.
    ///
    /// On success, returns the objective and key results re-read from the
    /// store, so the caller sees exactly what was persisted rather than the
    /// insert payload.
    pub async fn handle(
        &self,
        cmd: CreateObjectiveCommand,
    ) -> Result<ObjectiveWithKeyResults, CreateObjectiveError> {
        let objective = Objective::new(
            ObjectiveId::new(),
            cmd.owner,
            cmd.title,
            cmd.description,
            cmd.category,
            cmd.priority,
            cmd.target_date,
        )?;
        let objective_id = *objective.id();

        self.objectives
            .insert(&objective)
            .await
            .map_err(|e| CreateObjectiveError::Store(e.to_string()))?;

        // The objective row exists from here on; every failure below must
        // compensate by deleting it.
        for spec in cmd.key_results {
            let key_result = match KeyResult::new(KeyResultId::new(), objective_id, spec) {
                Ok(kr) => kr,
                Err(e) => {
                    return Err(self
                        .roll_back(objective_id, CreateObjectiveError::from(e))
                        .await);
                }
            };

            if let Err(e) = self.key_results.insert(&key_result).await {
                return Err(self
                    .roll_back(objective_id, CreateObjectiveError::Store(e.to_string()))
                    .await);
            }
        }

        self.reread(objective_id).await
    }

    /// Deletes the partially created objective and returns the original
    /// error, or `RollbackFailed` if the delete itself failed.
    async fn roll_back(
        &self,
        objective_id: ObjectiveId,
        original: CreateObjectiveError,
    ) -> CreateObjectiveError {
        warn!(
            objective_id = %objective_id,
            error = %original,
            "rolling back partially created objective"
        );

        match self.objectives.delete(&objective_id).await {
            Ok(_) => original,
            Err(delete_err) => {
                error!(
                    objective_id = %objective_id,
                    error = %delete_err,
                    "compensating delete failed; orphan objective left behind"
                );
                CreateObjectiveError::RollbackFailed {
                    objective_id,
                    reason: delete_err.to_string(),
                }
            }
        }
    }

    /// Re-reads the created objective and its key results from the store.
    async fn reread(
        &self,
        objective_id: ObjectiveId,
    ) -> Result<ObjectiveWithKeyResults, CreateObjectiveError> {
        let objective = self
            .objectives
            .find_by_id(&objective_id)
            .await
            .map_err(|e| CreateObjectiveError::Store(e.to_string()))?
            .ok_or_else(|| {
                CreateObjectiveError::Store(format!(
                    "objective {} missing after creation",
                    objective_id
                ))
            })?;

        let key_results = self
            .key_results
            .find_by_objective(&objective_id)
            .await
            .map_err(|e| CreateObjectiveError::Store(e.to_string()))?;

        Ok(ObjectiveWithKeyResults::new(objective, key_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::goal::MetricKind;
    use crate::ports::StoreError;
    use async_trait::async_trait;

    fn owner() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    fn command(key_results: Vec<KeyResultSpec>) -> CreateObjectiveCommand {
        CreateObjectiveCommand {
            owner: owner(),
            title: "Learn Rust".to_string(),
            description: "Work through the book and build a project".to_string(),
            category: "programming".to_string(),
            priority: Priority::High,
            target_date: None,
            key_results,
        }
    }

    fn spec(title: &str) -> KeyResultSpec {
        KeyResultSpec {
            title: title.to_string(),
            description: String::new(),
            metric_kind: MetricKind::Number,
            target_value: 20.0,
            current_value: 0.0,
        }
    }

    // Key result store that always rejects inserts.
    struct FailingKeyResultRepo;

    #[async_trait]
    impl KeyResultRepository for FailingKeyResultRepo {
        async fn insert(&self, _key_result: &KeyResult) -> Result<(), StoreError> {
            Err(StoreError::database("disk full"))
        }

        async fn find_by_id(
            &self,
            _id: &KeyResultId,
        ) -> Result<Option<KeyResult>, StoreError> {
            Ok(None)
        }

        async fn find_by_objective(
            &self,
            _objective_id: &ObjectiveId,
        ) -> Result<Vec<KeyResult>, StoreError> {
            Ok(Vec::new())
        }

        async fn update(&self, _key_result: &KeyResult) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    // Objective store whose deletes always fail, for exercising the
    // rollback-failure path.
    struct NoDeleteObjectiveRepo {
        inner: InMemoryStore,
    }

    #[async_trait]
    impl ObjectiveRepository for NoDeleteObjectiveRepo {
        async fn insert(&self, objective: &Objective) -> Result<(), StoreError> {
            ObjectiveRepository::insert(&self.inner, objective).await
        }

        async fn find_by_id(
            &self,
            id: &ObjectiveId,
        ) -> Result<Option<Objective>, StoreError> {
            ObjectiveRepository::find_by_id(&self.inner, id).await
        }

        async fn find_by_owner(&self, o: &UserId) -> Result<Vec<Objective>, StoreError> {
            ObjectiveRepository::find_by_owner(&self.inner, o).await
        }

        async fn update(&self, objective: &Objective) -> Result<bool, StoreError> {
            ObjectiveRepository::update(&self.inner, objective).await
        }

        async fn delete(&self, _id: &ObjectiveId) -> Result<bool, StoreError> {
            Err(StoreError::database("delete rejected"))
        }
    }

    mod creation {
        use super::*;

        #[tokio::test]
        async fn creates_objective_with_key_results() {
            let store = Arc::new(InMemoryStore::new());
            let handler = CreateObjectiveHandler::new(store.clone(), store.clone());

            let created = handler
                .handle(command(vec![spec("Read chapters"), spec("Build a CLI")]))
                .await
                .unwrap();

            assert_eq!(created.objective.title(), "Learn Rust");
            assert_eq!(created.key_results.len(), 2);
            assert_eq!(created.progress().value(), 0);
        }

        #[tokio::test]
        async fn creates_objective_without_key_results() {
            let store = Arc::new(InMemoryStore::new());
            let handler = CreateObjectiveHandler::new(store.clone(), store.clone());

            let created = handler.handle(command(Vec::new())).await.unwrap();

            assert!(created.key_results.is_empty());
            assert_eq!(created.progress().value(), 0);
        }

        #[tokio::test]
        async fn result_reflects_persisted_rows() {
            let store = Arc::new(InMemoryStore::new());
            let handler = CreateObjectiveHandler::new(store.clone(), store.clone());

            let created = handler.handle(command(vec![spec("Read")])).await.unwrap();

            let stored = ObjectiveRepository::find_by_id(store.as_ref(), created.objective.id())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored, created.objective);
        }
    }

    mod validation {
        use super::*;

        #[tokio::test]
        async fn rejects_empty_title_without_writing() {
            let store = Arc::new(InMemoryStore::new());
            let handler = CreateObjectiveHandler::new(store.clone(), store.clone());

            let mut cmd = command(Vec::new());
            cmd.title = "  ".to_string();

            let result = handler.handle(cmd).await;

            assert!(matches!(result, Err(CreateObjectiveError::Validation(_))));
            let listed = ObjectiveRepository::find_by_owner(store.as_ref(), &owner())
                .await
                .unwrap();
            assert!(listed.is_empty());
        }

        #[tokio::test]
        async fn rejects_empty_description() {
            let store = Arc::new(InMemoryStore::new());
            let handler = CreateObjectiveHandler::new(store.clone(), store.clone());

            let mut cmd = command(Vec::new());
            cmd.description = String::new();

            let result = handler.handle(cmd).await;
            assert!(matches!(result, Err(CreateObjectiveError::Validation(_))));
        }
    }

    mod rollback {
        use super::*;

        #[tokio::test]
        async fn invalid_key_result_rolls_back_everything() {
            let store = Arc::new(InMemoryStore::new());
            let handler = CreateObjectiveHandler::new(store.clone(), store.clone());

            // Two valid specs and one with a missing title
            let result = handler
                .handle(command(vec![spec("Read"), spec("Build"), spec("   ")]))
                .await;

            assert!(matches!(result, Err(CreateObjectiveError::Validation(_))));

            let objectives = ObjectiveRepository::find_by_owner(store.as_ref(), &owner())
                .await
                .unwrap();
            assert!(objectives.is_empty(), "objective must be rolled back");
        }

        #[tokio::test]
        async fn key_result_store_failure_rolls_back_objective() {
            let objectives = Arc::new(InMemoryStore::new());
            let handler =
                CreateObjectiveHandler::new(objectives.clone(), Arc::new(FailingKeyResultRepo));

            let result = handler.handle(command(vec![spec("Read")])).await;

            assert!(matches!(result, Err(CreateObjectiveError::Store(_))));
            let listed = ObjectiveRepository::find_by_owner(objectives.as_ref(), &owner())
                .await
                .unwrap();
            assert!(listed.is_empty(), "objective must be rolled back");
        }

        #[tokio::test]
        async fn failed_rollback_is_surfaced_distinctly() {
            let objectives = Arc::new(NoDeleteObjectiveRepo {
                inner: InMemoryStore::new(),
            });
            let handler =
                CreateObjectiveHandler::new(objectives.clone(), Arc::new(FailingKeyResultRepo));

            let result = handler.handle(command(vec![spec("Read")])).await;

            match result {
                Err(CreateObjectiveError::RollbackFailed { objective_id, .. }) => {
                    // The orphan objective is still there
                    let orphan = objectives.find_by_id(&objective_id).await.unwrap();
                    assert!(orphan.is_some());
                }
                other => panic!("expected RollbackFailed, got {:?}", other),
            }
        }
    }
}
