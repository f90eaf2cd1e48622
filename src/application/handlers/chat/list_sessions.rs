//! ListSessions query handler.
//!
//! Lists one user's sessions on one surface, most recently active first.

use crate::domain::chat::{ChatSession, SessionKind};
use crate::domain::foundation::UserId;
use crate::ports::ChatSessionRepository;
use std::sync::Arc;
use thiserror::Error;

/// Default bound when the caller does not supply one.
pub const DEFAULT_SESSION_LIMIT: u32 = 50;

/// Query for a user's sessions on one surface.
#[derive(Debug, Clone)]
pub struct ListSessionsQuery {
    /// The caller; only their own sessions come back.
    pub owner: UserId,
    /// Which surface to list.
    pub kind: SessionKind,
    /// Maximum sessions to return; zero means the default bound.
    pub limit: u32,
}

/// Errors that can occur when listing sessions.
#[derive(Debug, Clone, Error)]
pub enum ListSessionsError {
    /// The store failed the read.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for ListSessions queries.
pub struct ListSessionsHandler<S>
where
    S: ChatSessionRepository,
{
    sessions: Arc<S>,
}

impl<S> ListSessionsHandler<S>
where
    S: ChatSessionRepository,
{
    /// Creates a new handler with the given dependency.
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    /// Handles a list sessions query, ordered by `updated_at` descending.
    pub async fn handle(
        &self,
        query: ListSessionsQuery,
    ) -> Result<Vec<ChatSession>, ListSessionsError> {
        let limit = if query.limit == 0 {
            DEFAULT_SESSION_LIMIT
        } else {
            query.limit
        };

        self.sessions
            .find_by_owner(&query.owner, query.kind, limit)
            .await
            .map_err(|e| ListSessionsError::Store(e.to_string()))
    }
}
