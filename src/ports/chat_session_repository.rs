//! Chat session repository port.
//!
//! Row-level CRUD against the `chat_sessions` collection. The two
//! conversational surfaces live in the shared collection discriminated by
//! kind, and every owner-scoped query filters on it.

use crate::domain::chat::{ChatSession, SessionKind};
use crate::domain::foundation::{ChatSessionId, Timestamp, UserId};
use async_trait::async_trait;

use super::StoreError;

/// Repository port for ChatSession persistence.
///
/// Implementations must ensure:
/// - Deleting a session cascades to its messages
/// - Owner listings are ordered by `updated_at` descending
#[async_trait]
pub trait ChatSessionRepository: Send + Sync {
    /// Insert a new session row.
    async fn insert(&self, session: &ChatSession) -> Result<(), StoreError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ChatSessionId) -> Result<Option<ChatSession>, StoreError>;

    /// Find sessions owned by a user on one surface, most recently active
    /// first, bounded by `limit`.
    async fn find_by_owner(
        &self,
        owner: &UserId,
        kind: SessionKind,
        limit: u32,
    ) -> Result<Vec<ChatSession>, StoreError>;

    /// Bump a session's `updated_at`.
    ///
    /// Returns false if no row matched the id.
    async fn touch(&self, id: &ChatSessionId, at: Timestamp) -> Result<bool, StoreError>;

    /// Delete a session row, cascading to its messages.
    ///
    /// Returns false if no row matched the id.
    async fn delete(&self, id: &ChatSessionId) -> Result<bool, StoreError>;
}
