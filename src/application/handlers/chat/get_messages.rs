//! GetMessages query handler.
//!
//! Reconstructs a session transcript in chronological order. Ownership is
//! enforced explicitly: a foreign session yields `Forbidden`, not a silently
//! empty list, so the legitimate caller gets a clear signal while nothing
//! leaks about other users' sessions.

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{ChatSessionId, UserId};
use crate::ports::{ChatMessageRepository, ChatSessionRepository};
use std::sync::Arc;
use thiserror::Error;

/// Default bound when the caller does not supply one.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 200;

/// Query for one session's transcript.
#[derive(Debug, Clone)]
pub struct GetMessagesQuery {
    /// The session to read.
    pub session_id: ChatSessionId,
    /// The caller; must own the session.
    pub owner: UserId,
    /// Maximum messages to return; zero means the default bound.
    pub limit: u32,
}

/// Errors that can occur when reading a transcript.
#[derive(Debug, Clone, Error)]
pub enum GetMessagesError {
    /// No session exists with the given id.
    #[error("Session not found: {0}")]
    SessionNotFound(ChatSessionId),

    /// The session exists but belongs to a different owner.
    #[error("Forbidden: caller does not own this session")]
    Forbidden,

    /// The store failed a read.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for GetMessages queries.
pub struct GetMessagesHandler<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    sessions: Arc<S>,
    messages: Arc<M>,
}

impl<S, M> GetMessagesHandler<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(sessions: Arc<S>, messages: Arc<M>) -> Self {
        Self { sessions, messages }
    }

    /// Handles a get messages query, oldest message first.
    pub async fn handle(
        &self,
        query: GetMessagesQuery,
    ) -> Result<Vec<ChatMessage>, GetMessagesError> {
        let session = self
            .sessions
            .find_by_id(&query.session_id)
            .await
            .map_err(|e| GetMessagesError::Store(e.to_string()))?
            .ok_or(GetMessagesError::SessionNotFound(query.session_id))?;

        session
            .authorize(&query.owner)
            .map_err(|_| GetMessagesError::Forbidden)?;

        let limit = if query.limit == 0 {
            DEFAULT_MESSAGE_LIMIT
        } else {
            query.limit
        };

        self.messages
            .find_by_session(&query.session_id, limit)
            .await
            .map_err(|e| GetMessagesError::Store(e.to_string()))
    }
}
