//! EditObjective command handler.
//!
//! Owner-initiated metadata edits: title, description, category, priority,
//! status, target date. Fields left as `None` are unchanged. Progress never
//! moves through here; it only changes via key result updates.

use crate::domain::foundation::{ObjectiveId, Timestamp, UserId};
use crate::domain::goal::{Objective, ObjectiveStatus, Priority};
use crate::ports::ObjectiveRepository;
use std::sync::Arc;
use thiserror::Error;

/// The metadata fields an owner can change, patch style.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveEdit {
    /// New title, when changing.
    pub title: Option<String>,
    /// New description, when changing.
    pub description: Option<String>,
    /// New category tag, when changing.
    pub category: Option<String>,
    /// New priority, when changing.
    pub priority: Option<Priority>,
    /// New lifecycle status, when changing.
    pub status: Option<ObjectiveStatus>,
    /// New target date; the outer `Option` is "change it or not", the inner
    /// one sets or clears the date.
    pub target_date: Option<Option<Timestamp>>,
}

/// Command to edit an objective's metadata.
#[derive(Debug, Clone)]
pub struct EditObjectiveCommand {
    /// The objective to edit.
    pub objective_id: ObjectiveId,
    /// The caller; must own the objective.
    pub owner: UserId,
    /// The fields to change.
    pub edit: ObjectiveEdit,
}

/// Errors that can occur when editing an objective.
#[derive(Debug, Clone, Error)]
pub enum EditObjectiveError {
    /// No objective exists with the given id.
    #[error("Objective not found: {0}")]
    NotFound(ObjectiveId),

    /// The objective exists but belongs to a different owner.
    #[error("Forbidden: caller does not own this objective")]
    Forbidden,

    /// A new field value failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store failed the read or the write.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for EditObjective commands.
pub struct EditObjectiveHandler<O>
where
    O: ObjectiveRepository,
{
    objectives: Arc<O>,
}

impl<O> EditObjectiveHandler<O>
where
    O: ObjectiveRepository,
{
    /// Creates a new handler with the given dependency.
    pub fn new(objectives: Arc<O>) -> Self {
        Self { objectives }
    }

    /// Handles an edit objective command, returning the updated objective.
    pub async fn handle(
        &self,
        cmd: EditObjectiveCommand,
    ) -> Result<Objective, EditObjectiveError> {
        let mut objective = self
            .objectives
            .find_by_id(&cmd.objective_id)
            .await
            .map_err(|e| EditObjectiveError::Store(e.to_string()))?
            .ok_or(EditObjectiveError::NotFound(cmd.objective_id))?;

        objective
            .authorize(&cmd.owner)
            .map_err(|_| EditObjectiveError::Forbidden)?;

        let edit = cmd.edit;
        if let Some(title) = edit.title {
            objective
                .rename(title)
                .map_err(|e| EditObjectiveError::Validation(e.to_string()))?;
        }
        if let Some(description) = edit.description {
            objective
                .update_description(description)
                .map_err(|e| EditObjectiveError::Validation(e.to_string()))?;
        }
        if let Some(category) = edit.category {
            objective.set_category(category);
        }
        if let Some(priority) = edit.priority {
            objective.set_priority(priority);
        }
        if let Some(status) = edit.status {
            objective.set_status(status);
        }
        if let Some(target_date) = edit.target_date {
            objective.set_target_date(target_date);
        }

        let updated = self
            .objectives
            .update(&objective)
            .await
            .map_err(|e| EditObjectiveError::Store(e.to_string()))?;
        if !updated {
            // The row vanished between read and write.
            return Err(EditObjectiveError::NotFound(cmd.objective_id));
        }

        Ok(objective)
    }
}
