//! PostgreSQL implementation of ProgressHistoryRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{HistoryEntryId, KeyResultId, Timestamp, UserId};
use crate::domain::goal::ProgressHistoryEntry;
use crate::ports::{ProgressHistoryRepository, StoreError};

/// PostgreSQL implementation of ProgressHistoryRepository.
///
/// The `progress_history` table is append-only; there are deliberately no
/// update or delete statements here. Rows disappear only through the
/// objective cascade.
#[derive(Clone)]
pub struct PostgresProgressHistoryRepository {
    pool: PgPool,
}

impl PostgresProgressHistoryRepository {
    /// Creates a new PostgresProgressHistoryRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressHistoryRepository for PostgresProgressHistoryRepository {
    async fn append(&self, entry: &ProgressHistoryEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO progress_history (
                id, key_result_id, previous_value, new_value, note, actor_id, recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.key_result_id().as_uuid())
        .bind(entry.previous_value())
        .bind(entry.new_value())
        .bind(entry.note())
        .bind(entry.actor().as_str())
        .bind(entry.recorded_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to append history entry: {}", e)))?;

        Ok(())
    }

    async fn find_by_key_result(
        &self,
        key_result_id: &KeyResultId,
    ) -> Result<Vec<ProgressHistoryEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, key_result_id, previous_value, new_value, note, actor_id, recorded_at
            FROM progress_history
            WHERE key_result_id = $1
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(key_result_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch history: {}", e)))?;

        rows.iter()
            .map(|row| {
                let id: uuid::Uuid = row.get("id");
                let key_result_id: uuid::Uuid = row.get("key_result_id");
                let previous_value: f64 = row.get("previous_value");
                let new_value: f64 = row.get("new_value");
                let note: Option<String> = row.get("note");
                let actor: String = row.get("actor_id");
                let recorded_at: chrono::DateTime<chrono::Utc> = row.get("recorded_at");

                let actor = UserId::new(actor).map_err(|e| {
                    StoreError::serialization(format!("Invalid actor reference: {}", e))
                })?;

                Ok(ProgressHistoryEntry::reconstitute(
                    HistoryEntryId::from_uuid(id),
                    KeyResultId::from_uuid(key_result_id),
                    previous_value,
                    new_value,
                    note,
                    actor,
                    Timestamp::from_datetime(recorded_at),
                ))
            })
            .collect()
    }
}
