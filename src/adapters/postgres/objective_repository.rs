//! PostgreSQL implementation of ObjectiveRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{ObjectiveId, Timestamp, UserId};
use crate::domain::goal::{Objective, ObjectiveStatus, Priority};
use crate::ports::{ObjectiveRepository, StoreError};

/// PostgreSQL implementation of ObjectiveRepository.
///
/// Deleting an objective relies on the schema's `ON DELETE CASCADE`
/// constraints to remove key results and their history.
#[derive(Clone)]
pub struct PostgresObjectiveRepository {
    pool: PgPool,
}

impl PostgresObjectiveRepository {
    /// Creates a new PostgresObjectiveRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObjectiveRepository for PostgresObjectiveRepository {
    async fn insert(&self, objective: &Objective) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO objectives (
                id, owner_id, title, description, category, priority,
                status, target_date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(objective.id().as_uuid())
        .bind(objective.owner().as_str())
        .bind(objective.title())
        .bind(objective.description())
        .bind(objective.category())
        .bind(objective.priority().as_str())
        .bind(objective.status().as_str())
        .bind(objective.target_date().map(|d| *d.as_datetime()))
        .bind(objective.created_at().as_datetime())
        .bind(objective.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to insert objective: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectiveId) -> Result<Option<Objective>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, title, description, category, priority,
                   status, target_date, created_at, updated_at
            FROM objectives
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch objective: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_objective(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Objective>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, title, description, category, priority,
                   status, target_date, created_at, updated_at
            FROM objectives
            WHERE owner_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch objectives: {}", e)))?;

        rows.iter().map(row_to_objective).collect()
    }

    async fn update(&self, objective: &Objective) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE objectives SET
                title = $2,
                description = $3,
                category = $4,
                priority = $5,
                status = $6,
                target_date = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(objective.id().as_uuid())
        .bind(objective.title())
        .bind(objective.description())
        .bind(objective.category())
        .bind(objective.priority().as_str())
        .bind(objective.status().as_str())
        .bind(objective.target_date().map(|d| *d.as_datetime()))
        .bind(objective.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to update objective: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &ObjectiveId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM objectives WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database(format!("Failed to delete objective: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

// === Helper Functions ===

fn row_to_objective(row: &sqlx::postgres::PgRow) -> Result<Objective, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let owner: String = row.get("owner_id");
    let title: String = row.get("title");
    let description: String = row.get("description");
    let category: String = row.get("category");
    let priority_str: &str = row.get("priority");
    let status_str: &str = row.get("status");
    let target_date: Option<chrono::DateTime<chrono::Utc>> = row.get("target_date");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let owner = UserId::new(owner)
        .map_err(|e| StoreError::serialization(format!("Invalid owner reference: {}", e)))?;
    let priority = Priority::parse(priority_str)
        .ok_or_else(|| StoreError::serialization(format!("Invalid priority: {}", priority_str)))?;
    let status = ObjectiveStatus::parse(status_str)
        .ok_or_else(|| StoreError::serialization(format!("Invalid status: {}", status_str)))?;

    Ok(Objective::reconstitute(
        ObjectiveId::from_uuid(id),
        owner,
        title,
        description,
        category,
        priority,
        status,
        target_date.map(Timestamp::from_datetime),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
