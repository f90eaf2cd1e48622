//! PostgreSQL implementation of ChatMessageRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::chat::{ChatMessage, MessageMetadata, MessageRole};
use crate::domain::foundation::{ChatMessageId, ChatSessionId, Timestamp};
use crate::ports::{ChatMessageRepository, StoreError};

/// PostgreSQL implementation of ChatMessageRepository.
///
/// Messages are append-only; metadata is persisted as a `jsonb` column with
/// the fixed [`MessageMetadata`] shape.
#[derive(Clone)]
pub struct PostgresChatMessageRepository {
    pool: PgPool,
}

impl PostgresChatMessageRepository {
    /// Creates a new PostgresChatMessageRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatMessageRepository for PostgresChatMessageRepository {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let metadata = serde_json::to_value(message.metadata())
            .map_err(|e| StoreError::serialization(format!("Failed to encode metadata: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, session_id, role, content, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id().as_uuid())
        .bind(message.session_id().as_uuid())
        .bind(message.role().as_str())
        .bind(message.content())
        .bind(metadata)
        .bind(message.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to insert message: {}", e)))?;

        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: &ChatSessionId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, role, content, metadata, created_at
            FROM chat_messages
            WHERE session_id = $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch messages: {}", e)))?;

        rows.iter()
            .map(|row| {
                let id: uuid::Uuid = row.get("id");
                let session_id: uuid::Uuid = row.get("session_id");
                let role_str: &str = row.get("role");
                let content: String = row.get("content");
                let metadata: serde_json::Value = row.get("metadata");
                let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

                let role = MessageRole::parse(role_str).ok_or_else(|| {
                    StoreError::serialization(format!("Invalid message role: {}", role_str))
                })?;
                let metadata: MessageMetadata =
                    serde_json::from_value(metadata).map_err(|e| {
                        StoreError::serialization(format!("Failed to decode metadata: {}", e))
                    })?;

                Ok(ChatMessage::reconstitute(
                    ChatMessageId::from_uuid(id),
                    ChatSessionId::from_uuid(session_id),
                    role,
                    content,
                    metadata,
                    Timestamp::from_datetime(created_at),
                ))
            })
            .collect()
    }

    async fn count_by_session(&self, session_id: &ChatSessionId) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM chat_messages WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database(format!("Failed to count messages: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count as u64)
    }
}
