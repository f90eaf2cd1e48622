//! Conversational session engine command handlers.

mod delete_session;
mod get_messages;
mod list_sessions;
mod send_message;

pub use delete_session::{DeleteSessionCommand, DeleteSessionError, DeleteSessionHandler};
pub use get_messages::{
    GetMessagesError, GetMessagesHandler, GetMessagesQuery, DEFAULT_MESSAGE_LIMIT,
};
pub use list_sessions::{
    ListSessionsError, ListSessionsHandler, ListSessionsQuery, DEFAULT_SESSION_LIMIT,
};
pub use send_message::{
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult,
    DEFAULT_REPLY_TIMEOUT, FALLBACK_REPLY,
};
