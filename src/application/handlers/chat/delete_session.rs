//! DeleteSession command handler.
//!
//! Ownership-checked delete; the store cascade removes the messages. A
//! deleted session is terminal, there is no archive or undo.

use crate::domain::foundation::{ChatSessionId, UserId};
use crate::ports::ChatSessionRepository;
use std::sync::Arc;
use thiserror::Error;

/// Command to delete a session.
#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    /// The session to delete.
    pub session_id: ChatSessionId,
    /// The caller; must own the session.
    pub owner: UserId,
}

/// Errors that can occur when deleting a session.
#[derive(Debug, Clone, Error)]
pub enum DeleteSessionError {
    /// No session exists with the given id.
    #[error("Session not found: {0}")]
    SessionNotFound(ChatSessionId),

    /// The session exists but belongs to a different owner.
    #[error("Forbidden: caller does not own this session")]
    Forbidden,

    /// The store failed the read or the delete.
    #[error("Store error: {0}")]
    Store(String),
}

/// Handler for DeleteSession commands.
pub struct DeleteSessionHandler<S>
where
    S: ChatSessionRepository,
{
    sessions: Arc<S>,
}

impl<S> DeleteSessionHandler<S>
where
    S: ChatSessionRepository,
{
    /// Creates a new handler with the given dependency.
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    /// Handles a delete session command.
    pub async fn handle(&self, cmd: DeleteSessionCommand) -> Result<(), DeleteSessionError> {
        let session = self
            .sessions
            .find_by_id(&cmd.session_id)
            .await
            .map_err(|e| DeleteSessionError::Store(e.to_string()))?
            .ok_or(DeleteSessionError::SessionNotFound(cmd.session_id))?;

        session
            .authorize(&cmd.owner)
            .map_err(|_| DeleteSessionError::Forbidden)?;

        let deleted = self
            .sessions
            .delete(&cmd.session_id)
            .await
            .map_err(|e| DeleteSessionError::Store(e.to_string()))?;
        if !deleted {
            // The row vanished between the read and the delete.
            return Err(DeleteSessionError::SessionNotFound(cmd.session_id));
        }

        Ok(())
    }
}
