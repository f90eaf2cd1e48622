//! Chat module - conversational sessions and messages.

mod message;
mod session;

pub use message::{ChatMessage, MessageMetadata, MessageRole};
pub use session::{derive_title, ChatSession, SessionKind, MAX_DERIVED_TITLE_CHARS};
