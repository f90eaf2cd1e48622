//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the Pathwise domain.

mod errors;
mod ids;
mod progress;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ChatMessageId, ChatSessionId, HistoryEntryId, KeyResultId, ObjectiveId, UserId,
};
pub use progress::Progress;
pub use timestamp::Timestamp;
