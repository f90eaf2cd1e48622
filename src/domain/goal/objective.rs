//! Objective aggregate entity.
//!
//! Objectives are the top-level learning goals. Each objective belongs to one
//! user and owns its key results exclusively.
//!
//! # Aggregate progress
//!
//! An objective's progress is never stored. It is always computed from the
//! key results' derived progress values via [`ObjectiveWithKeyResults`],
//! which removes any chance of the stored rollup drifting out of sync.

use crate::domain::foundation::{
    DomainError, ErrorCode, ObjectiveId, Progress, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::KeyResult;

/// Maximum length for objective titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// How urgently the owner is treating an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Returns the storage label for this priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parses a storage label back into a priority.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Lifecycle status of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

impl ObjectiveStatus {
    /// Returns the storage label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveStatus::Draft => "draft",
            ObjectiveStatus::Active => "active",
            ObjectiveStatus::Completed => "completed",
            ObjectiveStatus::Archived => "archived",
        }
    }

    /// Parses a storage label back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ObjectiveStatus::Draft),
            "active" => Some(ObjectiveStatus::Active),
            "completed" => Some(ObjectiveStatus::Completed),
            "archived" => Some(ObjectiveStatus::Archived),
            _ => None,
        }
    }
}

/// Objective aggregate - a top-level learning goal.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `title` and `description` are non-empty
/// - aggregate progress is derived, never stored on this entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Unique identifier for this objective.
    id: ObjectiveId,

    /// User who owns this objective.
    owner: UserId,

    /// Objective title.
    title: String,

    /// What achieving this objective means.
    description: String,

    /// Free-form category tag.
    category: String,

    /// Owner-assigned priority.
    priority: Priority,

    /// Current lifecycle status.
    status: ObjectiveStatus,

    /// Optional date the owner wants to reach the objective by.
    target_date: Option<Timestamp>,

    /// When the objective was created.
    created_at: Timestamp,

    /// When the objective was last updated.
    updated_at: Timestamp,
}

impl Objective {
    /// Create a new active objective.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title or description is empty or title too long
    pub fn new(
        id: ObjectiveId,
        owner: UserId,
        title: String,
        description: String,
        category: String,
        priority: Priority,
        target_date: Option<Timestamp>,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_description(&description)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            owner,
            title,
            description,
            category,
            priority,
            status: ObjectiveStatus::Active,
            target_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute an objective from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ObjectiveId,
        owner: UserId,
        title: String,
        description: String,
        category: String,
        priority: Priority,
        status: ObjectiveStatus,
        target_date: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            description,
            category,
            priority,
            status,
            target_date,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the objective ID.
    pub fn id(&self) -> &ObjectiveId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category tag.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> ObjectiveStatus {
        self.status
    }

    /// Returns the target date, if one is set.
    pub fn target_date(&self) -> Option<&Timestamp> {
        self.target_date.as_ref()
    }

    /// Returns when the objective was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the objective was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given user owns this objective.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }

    /// Validates that the user can mutate this objective.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if user is not the owner
    pub fn authorize(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User is not authorized to access this objective",
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Rename the objective.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty or too long
    pub fn rename(&mut self, new_title: String) -> Result<(), DomainError> {
        Self::validate_title(&new_title)?;
        self.title = new_title;
        self.touch();
        Ok(())
    }

    /// Update the description.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if description is empty
    pub fn update_description(&mut self, description: String) -> Result<(), DomainError> {
        Self::validate_description(&description)?;
        self.description = description;
        self.touch();
        Ok(())
    }

    /// Replace the category tag.
    pub fn set_category(&mut self, category: String) {
        self.category = category;
        self.touch();
    }

    /// Change the priority.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    /// Move the objective to a new lifecycle status.
    pub fn set_status(&mut self, status: ObjectiveStatus) {
        self.status = status;
        self.touch();
    }

    /// Set or clear the target date.
    pub fn set_target_date(&mut self, target_date: Option<Timestamp>) {
        self.target_date = target_date;
        self.touch();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if title.len() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), DomainError> {
        if description.trim().is_empty() {
            return Err(DomainError::validation(
                "description",
                "Description cannot be empty",
            ));
        }
        Ok(())
    }
}

/// An objective together with its key results and computed rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWithKeyResults {
    pub objective: Objective,
    pub key_results: Vec<KeyResult>,
}

impl ObjectiveWithKeyResults {
    /// Creates the view from an objective and its key results.
    pub fn new(objective: Objective, key_results: Vec<KeyResult>) -> Self {
        Self {
            objective,
            key_results,
        }
    }

    /// The aggregate progress: mean of the key results' progress values,
    /// rounded to the nearest integer. Zero when there are no key results.
    pub fn progress(&self) -> Progress {
        Progress::mean(self.key_results.iter().map(|kr| kr.progress()))
    }
}
