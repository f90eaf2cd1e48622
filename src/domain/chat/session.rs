//! Chat session entity.
//!
//! A session is one conversation thread between a user and an AI surface.
//! Sessions are created lazily on the first message and deleted explicitly
//! by their owner; deletion cascades to all messages and is terminal.

use crate::domain::foundation::{ChatSessionId, DomainError, ErrorCode, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Maximum length of a derived session title, in characters.
pub const MAX_DERIVED_TITLE_CHARS: usize = 50;

/// Which conversational surface a session belongs to.
///
/// The two surfaces share one entity and one state contract; the store keeps
/// them apart by this discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Open-ended AI companion conversations.
    Companion,
    /// Question answering over the knowledge base.
    KnowledgeQa,
}

impl SessionKind {
    /// Returns the storage label for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Companion => "companion",
            SessionKind::KnowledgeQa => "knowledge_qa",
        }
    }

    /// Parses a storage label back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "companion" => Some(SessionKind::Companion),
            "knowledge_qa" => Some(SessionKind::KnowledgeQa),
            _ => None,
        }
    }
}

/// Derives a session title from the first message: the first 50 characters,
/// ellipsized when truncated.
pub fn derive_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    let mut title: String = trimmed.chars().take(MAX_DERIVED_TITLE_CHARS).collect();
    if trimmed.chars().count() > MAX_DERIVED_TITLE_CHARS {
        title.push('…');
    }
    title
}

/// A conversation thread owned by one user.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `updated_at` moves forward on every appended message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique identifier for this session.
    id: ChatSessionId,

    /// User who owns this session.
    owner: UserId,

    /// Which surface this session belongs to.
    kind: SessionKind,

    /// Title derived from the first message.
    title: String,

    /// When the session was created.
    created_at: Timestamp,

    /// When a message was last appended.
    updated_at: Timestamp,
}

impl ChatSession {
    /// Opens a new session, deriving its title from the first message.
    pub fn open(
        id: ChatSessionId,
        owner: UserId,
        kind: SessionKind,
        first_message: &str,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            owner,
            kind,
            title: derive_title(first_message),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a session from persistence.
    pub fn reconstitute(
        id: ChatSessionId,
        owner: UserId,
        kind: SessionKind,
        title: String,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            kind,
            title,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &ChatSessionId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns which surface this session belongs to.
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Returns the derived title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when a message was last appended.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given user owns this session.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }

    /// Validates that the user can access this session.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if user is not the owner
    pub fn authorize(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User is not authorized to access this session",
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Bumps `updated_at`; called whenever a message is appended.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
