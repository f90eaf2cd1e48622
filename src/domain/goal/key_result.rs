//! Key result entity.
//!
//! A key result is a measurable sub-target owned by exactly one objective.
//! Its progress is derived from the metric rule on every value change and is
//! the only input to the objective's aggregate rollup.

use crate::domain::foundation::{
    DomainError, KeyResultId, ObjectiveId, Progress, Timestamp,
};
use serde::{Deserialize, Serialize};

use super::MetricKind;

/// Lifecycle status of a key result.
///
/// `Completed` tracks derived progress: a key result is completed exactly
/// while its progress sits at 100, and moves back to `Active` if the value
/// drops (e.g. a boolean metric is unchecked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyResultStatus {
    Active,
    Completed,
}

impl KeyResultStatus {
    /// Returns the storage label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyResultStatus::Active => "active",
            KeyResultStatus::Completed => "completed",
        }
    }

    /// Parses a storage label back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(KeyResultStatus::Active),
            "completed" => Some(KeyResultStatus::Completed),
            _ => None,
        }
    }

    fn for_progress(progress: Progress) -> Self {
        if progress.is_complete() {
            KeyResultStatus::Completed
        } else {
            KeyResultStatus::Active
        }
    }
}

/// Caller-supplied fields for creating a key result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResultSpec {
    pub title: String,
    pub description: String,
    pub metric_kind: MetricKind,
    pub target_value: f64,
    pub current_value: f64,
}

/// A measurable sub-target belonging to exactly one objective.
///
/// # Invariants
///
/// - `title` is non-empty
/// - `progress` always equals the metric derivation of `current_value`
///   against `target_value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    /// Unique identifier for this key result.
    id: KeyResultId,

    /// The objective that exclusively owns this key result.
    objective_id: ObjectiveId,

    /// Key result title.
    title: String,

    /// Optional free-text description.
    description: String,

    /// How advancement is measured.
    metric_kind: MetricKind,

    /// The value that counts as done.
    target_value: f64,

    /// The latest recorded value.
    current_value: f64,

    /// Derived progress, recomputed on every value change.
    progress: Progress,

    /// Current lifecycle status.
    status: KeyResultStatus,

    /// When the key result was created.
    created_at: Timestamp,

    /// When the key result was last updated.
    updated_at: Timestamp,
}

impl KeyResult {
    /// Create a new key result from a spec.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty
    pub fn new(
        id: KeyResultId,
        objective_id: ObjectiveId,
        spec: KeyResultSpec,
    ) -> Result<Self, DomainError> {
        if spec.title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }

        let progress = spec
            .metric_kind
            .derive_progress(spec.current_value, spec.target_value);
        let now = Timestamp::now();
        Ok(Self {
            id,
            objective_id,
            title: spec.title,
            description: spec.description,
            metric_kind: spec.metric_kind,
            target_value: spec.target_value,
            current_value: spec.current_value,
            progress,
            status: KeyResultStatus::for_progress(progress),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a key result from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: KeyResultId,
        objective_id: ObjectiveId,
        title: String,
        description: String,
        metric_kind: MetricKind,
        target_value: f64,
        current_value: f64,
        status: KeyResultStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        let progress = metric_kind.derive_progress(current_value, target_value);
        Self {
            id,
            objective_id,
            title,
            description,
            metric_kind,
            target_value,
            current_value,
            progress,
            status,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the key result ID.
    pub fn id(&self) -> &KeyResultId {
        &self.id
    }

    /// Returns the owning objective's ID.
    pub fn objective_id(&self) -> &ObjectiveId {
        &self.objective_id
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the metric kind.
    pub fn metric_kind(&self) -> MetricKind {
        self.metric_kind
    }

    /// Returns the target value.
    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    /// Returns the latest recorded value.
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Returns the derived progress.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> KeyResultStatus {
        self.status
    }

    /// Returns when the key result was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the key result was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Records a new current value and recomputes derived progress.
    ///
    /// No upper bound is enforced on the value itself; over-achievement is
    /// allowed and the derived progress clamps at 100.
    ///
    /// Returns the value that was replaced.
    pub fn record_progress(&mut self, new_current_value: f64) -> f64 {
        let previous = self.current_value;
        self.current_value = new_current_value;
        self.progress = self
            .metric_kind
            .derive_progress(self.current_value, self.target_value);
        self.status = KeyResultStatus::for_progress(self.progress);
        self.updated_at = Timestamp::now();
        previous
    }
}
