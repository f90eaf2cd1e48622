//! Chat message entity.
//!
//! Messages are immutable records of user/AI turns within a session. A user
//! turn and its AI reply are two distinct messages; no streaming intermediate
//! state is ever persisted. Within a session, messages are strictly ordered
//! by creation timestamp.

use crate::domain::foundation::{ChatMessageId, ChatSessionId, DomainError, Timestamp};
use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// The session owner's input.
    User,
    /// A reply produced by the inference backend (or the degraded-mode
    /// fallback when that call fails).
    Ai,
}

impl MessageRole {
    /// Returns the storage label for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Ai => "ai",
        }
    }

    /// Parses a storage label back into a role.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(MessageRole::User),
            "ai" => Some(MessageRole::Ai),
            _ => None,
        }
    }
}

/// Structured metadata attached to AI replies.
///
/// A fixed, enumerated shape rather than an open dictionary: every field is
/// optional or defaulted, and unknown keys have nowhere to hide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Model confidence in the answer, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Wall-clock time spent producing the reply, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// Follow-up suggestions offered with the reply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,

    /// Knowledge base entries the answer drew on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_knowledge_ids: Vec<String>,
}

impl MessageMetadata {
    /// Returns true if no metadata field is populated.
    pub fn is_empty(&self) -> bool {
        self.confidence.is_none()
            && self.processing_time_ms.is_none()
            && self.suggestions.is_empty()
            && self.related_knowledge_ids.is_empty()
    }
}

/// An immutable message within a chat session.
///
/// # Invariants
///
/// - `content` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier for this message.
    id: ChatMessageId,

    /// The session this message belongs to.
    session_id: ChatSessionId,

    /// The role of the message sender.
    role: MessageRole,

    /// The content of the message.
    content: String,

    /// Structured metadata (populated on AI replies).
    metadata: MessageMetadata,

    /// When the message was created.
    created_at: Timestamp,
}

impl ChatMessage {
    /// Creates a user message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn user(session_id: ChatSessionId, content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        Self::validate_content(&content)?;

        Ok(Self {
            id: ChatMessageId::new(),
            session_id,
            role: MessageRole::User,
            content,
            metadata: MessageMetadata::default(),
            created_at: Timestamp::now(),
        })
    }

    /// Creates an AI reply with its metadata.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn ai(
        session_id: ChatSessionId,
        content: impl Into<String>,
        metadata: MessageMetadata,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        Self::validate_content(&content)?;

        Ok(Self {
            id: ChatMessageId::new(),
            session_id,
            role: MessageRole::Ai,
            content,
            metadata,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: ChatMessageId,
        session_id: ChatSessionId,
        role: MessageRole,
        content: String,
        metadata: MessageMetadata,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            role,
            content,
            metadata,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the message ID.
    pub fn id(&self) -> &ChatMessageId {
        &self.id
    }

    /// Returns the session this message belongs to.
    pub fn session_id(&self) -> &ChatSessionId {
        &self.session_id
    }

    /// Returns the role.
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the structured metadata.
    pub fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Returns true if this message is an AI reply.
    pub fn is_ai(&self) -> bool {
        self.role == MessageRole::Ai
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn user_creates_user_message() {
            let msg = ChatMessage::user(ChatSessionId::new(), "Hello").unwrap();
            assert!(msg.is_user());
            assert!(!msg.is_ai());
            assert!(msg.metadata().is_empty());
        }

        #[test]
        fn ai_creates_reply_with_metadata() {
            let metadata = MessageMetadata {
                confidence: Some(0.92),
                processing_time_ms: Some(840),
                suggestions: vec!["Ask about borrowing".to_string()],
                related_knowledge_ids: vec!["kb-17".to_string()],
            };
            let msg =
                ChatMessage::ai(ChatSessionId::new(), "Ownership means...", metadata.clone())
                    .unwrap();

            assert!(msg.is_ai());
            assert_eq!(msg.metadata(), &metadata);
        }

        #[test]
        fn rejects_empty_content() {
            assert!(ChatMessage::user(ChatSessionId::new(), "").is_err());
        }

        #[test]
        fn rejects_whitespace_only_content() {
            assert!(ChatMessage::user(ChatSessionId::new(), "   \n\t").is_err());
        }
    }

    mod metadata {
        use super::*;

        #[test]
        fn default_metadata_is_empty() {
            assert!(MessageMetadata::default().is_empty());
        }

        #[test]
        fn empty_fields_are_omitted_from_json() {
            let json = serde_json::to_string(&MessageMetadata::default()).unwrap();
            assert_eq!(json, "{}");
        }

        #[test]
        fn populated_metadata_round_trips() {
            let metadata = MessageMetadata {
                confidence: Some(0.5),
                processing_time_ms: Some(120),
                suggestions: Vec::new(),
                related_knowledge_ids: vec!["kb-3".to_string()],
            };
            let json = serde_json::to_string(&metadata).unwrap();
            let back: MessageMetadata = serde_json::from_str(&json).unwrap();
            assert_eq!(back, metadata);
        }
    }

    mod reconstitute {
        use super::*;

        #[test]
        fn reconstitute_preserves_all_fields() {
            let id = ChatMessageId::new();
            let session_id = ChatSessionId::new();
            let created_at = Timestamp::now();

            let msg = ChatMessage::reconstitute(
                id,
                session_id,
                MessageRole::Ai,
                "answer".to_string(),
                MessageMetadata::default(),
                created_at,
            );

            assert_eq!(msg.id(), &id);
            assert_eq!(msg.session_id(), &session_id);
            assert_eq!(msg.role(), MessageRole::Ai);
            assert_eq!(msg.created_at(), &created_at);
        }
    }
}
