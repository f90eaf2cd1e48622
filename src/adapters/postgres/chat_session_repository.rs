//! PostgreSQL implementation of ChatSessionRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::chat::{ChatSession, SessionKind};
use crate::domain::foundation::{ChatSessionId, Timestamp, UserId};
use crate::ports::{ChatSessionRepository, StoreError};

/// PostgreSQL implementation of ChatSessionRepository.
///
/// Deleting a session relies on the schema's `ON DELETE CASCADE` constraint
/// to remove its messages.
#[derive(Clone)]
pub struct PostgresChatSessionRepository {
    pool: PgPool,
}

impl PostgresChatSessionRepository {
    /// Creates a new PostgresChatSessionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatSessionRepository for PostgresChatSessionRepository {
    async fn insert(&self, session: &ChatSession) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, owner_id, kind, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.owner().as_str())
        .bind(session.kind().as_str())
        .bind(session.title())
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to insert session: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ChatSessionId) -> Result<Option<ChatSession>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, kind, title, created_at, updated_at
            FROM chat_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch session: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_owner(
        &self,
        owner: &UserId,
        kind: SessionKind,
        limit: u32,
    ) -> Result<Vec<ChatSession>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, kind, title, created_at, updated_at
            FROM chat_sessions
            WHERE owner_id = $1 AND kind = $2
            ORDER BY updated_at DESC
            LIMIT $3
            "#,
        )
        .bind(owner.as_str())
        .bind(kind.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch sessions: {}", e)))?;

        rows.iter().map(row_to_session).collect()
    }

    async fn touch(&self, id: &ChatSessionId, at: Timestamp) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_sessions SET updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to touch session: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &ChatSessionId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database(format!("Failed to delete session: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

// === Helper Functions ===

fn row_to_session(row: &sqlx::postgres::PgRow) -> Result<ChatSession, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let owner: String = row.get("owner_id");
    let kind_str: &str = row.get("kind");
    let title: String = row.get("title");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let owner = UserId::new(owner)
        .map_err(|e| StoreError::serialization(format!("Invalid owner reference: {}", e)))?;
    let kind = SessionKind::parse(kind_str)
        .ok_or_else(|| StoreError::serialization(format!("Invalid session kind: {}", kind_str)))?;

    Ok(ChatSession::reconstitute(
        ChatSessionId::from_uuid(id),
        owner,
        kind,
        title,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
