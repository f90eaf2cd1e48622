//! PostgreSQL implementation of KeyResultRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{KeyResultId, ObjectiveId, Timestamp};
use crate::domain::goal::{KeyResult, KeyResultStatus, MetricKind};
use crate::ports::{KeyResultRepository, StoreError};

/// PostgreSQL implementation of KeyResultRepository.
#[derive(Clone)]
pub struct PostgresKeyResultRepository {
    pool: PgPool,
}

impl PostgresKeyResultRepository {
    /// Creates a new PostgresKeyResultRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyResultRepository for PostgresKeyResultRepository {
    async fn insert(&self, key_result: &KeyResult) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO key_results (
                id, objective_id, title, description, metric_kind,
                target_value, current_value, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(key_result.id().as_uuid())
        .bind(key_result.objective_id().as_uuid())
        .bind(key_result.title())
        .bind(key_result.description())
        .bind(key_result.metric_kind().as_str())
        .bind(key_result.target_value())
        .bind(key_result.current_value())
        .bind(key_result.status().as_str())
        .bind(key_result.created_at().as_datetime())
        .bind(key_result.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to insert key result: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &KeyResultId) -> Result<Option<KeyResult>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, objective_id, title, description, metric_kind,
                   target_value, current_value, status, created_at, updated_at
            FROM key_results
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch key result: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_key_result(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_objective(
        &self,
        objective_id: &ObjectiveId,
    ) -> Result<Vec<KeyResult>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, objective_id, title, description, metric_kind,
                   target_value, current_value, status, created_at, updated_at
            FROM key_results
            WHERE objective_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(objective_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch key results: {}", e)))?;

        rows.iter().map(row_to_key_result).collect()
    }

    async fn update(&self, key_result: &KeyResult) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE key_results SET
                title = $2,
                description = $3,
                current_value = $4,
                status = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(key_result.id().as_uuid())
        .bind(key_result.title())
        .bind(key_result.description())
        .bind(key_result.current_value())
        .bind(key_result.status().as_str())
        .bind(key_result.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to update key result: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

// === Helper Functions ===

fn row_to_key_result(row: &sqlx::postgres::PgRow) -> Result<KeyResult, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let objective_id: uuid::Uuid = row.get("objective_id");
    let title: String = row.get("title");
    let description: String = row.get("description");
    let metric_kind_str: &str = row.get("metric_kind");
    let target_value: f64 = row.get("target_value");
    let current_value: f64 = row.get("current_value");
    let status_str: &str = row.get("status");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let metric_kind = MetricKind::parse(metric_kind_str).ok_or_else(|| {
        StoreError::serialization(format!("Invalid metric kind: {}", metric_kind_str))
    })?;
    let status = KeyResultStatus::parse(status_str)
        .ok_or_else(|| StoreError::serialization(format!("Invalid status: {}", status_str)))?;

    Ok(KeyResult::reconstitute(
        KeyResultId::from_uuid(id),
        ObjectiveId::from_uuid(objective_id),
        title,
        description,
        metric_kind,
        target_value,
        current_value,
        status,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
