//! Chat message repository port.
//!
//! Append-only access to the `chat_messages` collection. Messages are
//! immutable once written; removal happens only via the session cascade.

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::ChatSessionId;
use async_trait::async_trait;

use super::StoreError;

/// Repository port for ChatMessage persistence.
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Append a message to a session.
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// Find messages for a session in chronological order, bounded by
    /// `limit`.
    async fn find_by_session(
        &self,
        session_id: &ChatSessionId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, StoreError>;

    /// Count the messages in a session.
    async fn count_by_session(&self, session_id: &ChatSessionId) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn chat_message_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ChatMessageRepository) {}
    }
}
