//! SendMessage command handler.
//!
//! Appends a user turn to a session (creating the session on first contact),
//! asks the inference backend for a reply, and appends the reply. The user
//! message is persisted before the inference call is attempted, so the
//! user's input survives any downstream failure, and retries append new
//! turns instead of mutating old ones.
//!
//! Inference failures fail open: the handler persists a fixed fallback reply
//! and reports `success: false` instead of erroring, because by that point a
//! partial result (the user turn) already exists and the transcript must
//! stay continuous.

use crate::domain::chat::{ChatMessage, ChatSession, MessageMetadata, SessionKind};
use crate::domain::foundation::{ChatSessionId, DomainError, Timestamp, UserId};
use crate::ports::{
    ChatMessageRepository, ChatSessionRepository, InferenceProvider, InferenceRequest,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

/// Reply recorded when the inference backend fails or times out.
pub const FALLBACK_REPLY: &str =
    "Sorry, I wasn't able to put an answer together right now. Your message is saved; please try again in a moment.";

/// Default ceiling on the inference call.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(30);

/// Command to send a message on one of the conversational surfaces.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// Existing session to append to; a new session is created when absent.
    pub session_id: Option<ChatSessionId>,
    /// Which surface the message belongs to. Used when creating a session;
    /// an existing session keeps the kind it was created with.
    pub kind: SessionKind,
    /// The message content.
    pub content: String,
    /// The user sending the message.
    pub owner: UserId,
}

/// Errors that can occur when sending a message.
///
/// Inference failures are deliberately absent: they resolve into the
/// degraded-mode reply, not an error.
#[derive(Debug, Clone, Error)]
pub enum SendMessageError {
    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyContent,

    /// A session id was supplied but no such session exists.
    #[error("Session not found: {0}")]
    SessionNotFound(ChatSessionId),

    /// A session id was supplied but the session belongs to someone else.
    #[error("Forbidden: caller does not own this session")]
    NotSessionOwner,

    /// A persistence operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Domain invariant failure while building messages.
    #[error("Domain error: {0}")]
    Domain(String),
}

impl From<DomainError> for SendMessageError {
    fn from(err: DomainError) -> Self {
        SendMessageError::Domain(err.to_string())
    }
}

/// Result of sending a message.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    /// The session the turn landed in (created on first contact).
    pub session_id: ChatSessionId,
    /// The persisted user message.
    pub user_message: ChatMessage,
    /// The persisted AI reply (real answer or fallback).
    pub reply: ChatMessage,
    /// False when the reply is the degraded-mode fallback.
    pub success: bool,
}

/// Handler for SendMessage commands.
pub struct SendMessageHandler<S, M, P>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
    P: InferenceProvider,
{
    sessions: Arc<S>,
    messages: Arc<M>,
    provider: Arc<P>,
    reply_timeout: Duration,
}

impl<S, M, P> SendMessageHandler<S, M, P>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
    P: InferenceProvider,
{
    /// Creates a new handler with the default reply timeout.
    pub fn new(sessions: Arc<S>, messages: Arc<M>, provider: Arc<P>) -> Self {
        Self {
            sessions,
            messages,
            provider,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    /// Overrides the reply timeout.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Handles a send message command.
    pub async fn handle(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<SendMessageResult, SendMessageError> {
        let content = cmd.content.trim();
        if content.is_empty() {
            return Err(SendMessageError::EmptyContent);
        }

        let session = self.resolve_session(&cmd, content).await?;
        let session_id = *session.id();

        // Persist the user turn before any inference attempt. Whatever
        // happens downstream, the question is already in the transcript.
        let user_message = ChatMessage::user(session_id, content)?;
        self.messages
            .append(&user_message)
            .await
            .map_err(|e| SendMessageError::Store(e.to_string()))?;
        self.touch(&session_id).await;

        let started = Instant::now();
        let request = InferenceRequest::new(content, cmd.owner.clone(), session_id);
        let outcome = tokio::time::timeout(self.reply_timeout, self.provider.answer(request)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (reply, success) = match outcome {
            Ok(Ok(answer)) if !answer.answer.trim().is_empty() => {
                let metadata = MessageMetadata {
                    confidence: answer.confidence,
                    processing_time_ms: Some(elapsed_ms),
                    suggestions: answer.suggestions,
                    related_knowledge_ids: answer.related_knowledge_ids,
                };
                (ChatMessage::ai(session_id, answer.answer, metadata)?, true)
            }
            Ok(Ok(_)) => {
                warn!(session_id = %session_id, "inference returned an empty answer");
                (self.fallback_reply(session_id, elapsed_ms)?, false)
            }
            Ok(Err(e)) => {
                warn!(session_id = %session_id, error = %e, "inference call failed");
                (self.fallback_reply(session_id, elapsed_ms)?, false)
            }
            Err(_) => {
                warn!(
                    session_id = %session_id,
                    timeout_secs = self.reply_timeout.as_secs(),
                    "inference call timed out"
                );
                (self.fallback_reply(session_id, elapsed_ms)?, false)
            }
        };

        // The reply write happens regardless of how the inference call
        // ended; a tripped timeout must not cancel it.
        self.messages
            .append(&reply)
            .await
            .map_err(|e| SendMessageError::Store(e.to_string()))?;
        self.touch(&session_id).await;

        Ok(SendMessageResult {
            session_id,
            user_message,
            reply,
            success,
        })
    }

    /// Resolves the target session: verifies a supplied id, or creates a
    /// new session titled after the first message.
    async fn resolve_session(
        &self,
        cmd: &SendMessageCommand,
        content: &str,
    ) -> Result<ChatSession, SendMessageError> {
        match cmd.session_id {
            Some(id) => {
                let session = self
                    .sessions
                    .find_by_id(&id)
                    .await
                    .map_err(|e| SendMessageError::Store(e.to_string()))?
                    .ok_or(SendMessageError::SessionNotFound(id))?;
                session
                    .authorize(&cmd.owner)
                    .map_err(|_| SendMessageError::NotSessionOwner)?;
                Ok(session)
            }
            None => {
                let session = ChatSession::open(
                    ChatSessionId::new(),
                    cmd.owner.clone(),
                    cmd.kind,
                    content,
                );
                self.sessions
                    .insert(&session)
                    .await
                    .map_err(|e| SendMessageError::Store(e.to_string()))?;
                Ok(session)
            }
        }
    }

    /// Builds the degraded-mode reply carrying the elapsed processing time.
    fn fallback_reply(
        &self,
        session_id: ChatSessionId,
        elapsed_ms: u64,
    ) -> Result<ChatMessage, SendMessageError> {
        let metadata = MessageMetadata {
            processing_time_ms: Some(elapsed_ms),
            ..MessageMetadata::default()
        };
        Ok(ChatMessage::ai(session_id, FALLBACK_REPLY, metadata)?)
    }

    /// Bumps the session's `updated_at`. Best-effort: a failure here loses
    /// recency ordering, not data, so it is logged and swallowed.
    async fn touch(&self, session_id: &ChatSessionId) {
        if let Err(e) = self.sessions.touch(session_id, Timestamp::now()).await {
            warn!(session_id = %session_id, error = %e, "failed to bump session updated_at");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::inference::MockInferenceProvider;
    use crate::adapters::memory::InMemoryStore;
    use crate::ports::{InferenceAnswer, InferenceError};

    fn owner() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    fn command(session_id: Option<ChatSessionId>, content: &str) -> SendMessageCommand {
        SendMessageCommand {
            session_id,
            kind: SessionKind::KnowledgeQa,
            content: content.to_string(),
            owner: owner(),
        }
    }

    fn handler(
        store: &Arc<InMemoryStore>,
        provider: MockInferenceProvider,
    ) -> SendMessageHandler<InMemoryStore, InMemoryStore, MockInferenceProvider> {
        SendMessageHandler::new(store.clone(), store.clone(), Arc::new(provider))
    }

    mod validation {
        use super::*;

        #[tokio::test]
        async fn rejects_empty_content() {
            let store = Arc::new(InMemoryStore::new());
            let handler = handler(&store, MockInferenceProvider::new().with_answer("hi"));

            let result = handler.handle(command(None, "")).await;
            assert!(matches!(result, Err(SendMessageError::EmptyContent)));
        }

        #[tokio::test]
        async fn rejects_whitespace_only_content() {
            let store = Arc::new(InMemoryStore::new());
            let handler = handler(&store, MockInferenceProvider::new().with_answer("hi"));

            let result = handler.handle(command(None, "   \n\t  ")).await;
            assert!(matches!(result, Err(SendMessageError::EmptyContent)));
        }
    }

    mod session_resolution {
        use super::*;

        #[tokio::test]
        async fn first_message_creates_session_with_derived_title() {
            let store = Arc::new(InMemoryStore::new());
            let handler = handler(&store, MockInferenceProvider::new().with_answer("An answer"));

            let result = handler
                .handle(command(None, "What is a borrow checker?"))
                .await
                .unwrap();

            let session = ChatSessionRepository::find_by_id(store.as_ref(), &result.session_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(session.title(), "What is a borrow checker?");
            assert_eq!(session.kind(), SessionKind::KnowledgeQa);
        }

        #[tokio::test]
        async fn later_messages_reuse_the_session() {
            let store = Arc::new(InMemoryStore::new());
            let handler = handler(&store, MockInferenceProvider::new().with_answer("An answer"));

            let first = handler.handle(command(None, "First question")).await.unwrap();
            let second = handler
                .handle(command(Some(first.session_id), "Second question"))
                .await
                .unwrap();

            assert_eq!(first.session_id, second.session_id);
            assert_eq!(
                store.count_by_session(&first.session_id).await.unwrap(),
                4
            );
        }

        #[tokio::test]
        async fn unknown_session_id_is_not_found() {
            let store = Arc::new(InMemoryStore::new());
            let handler = handler(&store, MockInferenceProvider::new().with_answer("hi"));

            let missing = ChatSessionId::new();
            let result = handler.handle(command(Some(missing), "hello")).await;

            assert!(
                matches!(result, Err(SendMessageError::SessionNotFound(id)) if id == missing)
            );
        }

        #[tokio::test]
        async fn foreign_session_is_rejected() {
            let store = Arc::new(InMemoryStore::new());
            let handler = handler(&store, MockInferenceProvider::new().with_answer("hi"));

            let first = handler.handle(command(None, "mine")).await.unwrap();

            let mut foreign = command(Some(first.session_id), "theirs");
            foreign.owner = UserId::new("intruder").unwrap();
            let result = handler.handle(foreign).await;

            assert!(matches!(result, Err(SendMessageError::NotSessionOwner)));
        }
    }

    mod replies {
        use super::*;

        #[tokio::test]
        async fn successful_inference_persists_two_ordered_messages() {
            let store = Arc::new(InMemoryStore::new());
            let provider = MockInferenceProvider::new().with_full_answer(InferenceAnswer {
                answer: "Lifetimes name borrow scopes.".to_string(),
                confidence: Some(0.87),
                suggestions: vec!["Ask about NLL".to_string()],
                related_knowledge_ids: vec!["kb-9".to_string()],
            });
            let handler = handler(&store, provider);

            let result = handler
                .handle(command(None, "What are lifetimes?"))
                .await
                .unwrap();

            assert!(result.success);
            let messages = store
                .find_by_session(&result.session_id, 10)
                .await
                .unwrap();
            assert_eq!(messages.len(), 2);
            assert!(messages[0].is_user());
            assert!(messages[1].is_ai());
            assert_eq!(messages[1].content(), "Lifetimes name borrow scopes.");
            assert_eq!(messages[1].metadata().confidence, Some(0.87));
            assert!(messages[1].metadata().processing_time_ms.is_some());
        }

        #[tokio::test]
        async fn backend_error_degrades_to_fallback_reply() {
            let store = Arc::new(InMemoryStore::new());
            let provider =
                MockInferenceProvider::new().with_error(InferenceError::status(503));
            let handler = handler(&store, provider);

            let result = handler.handle(command(None, "Anyone there?")).await.unwrap();

            assert!(!result.success);
            assert_eq!(result.reply.content(), FALLBACK_REPLY);

            // The user turn is still in the transcript
            let messages = store
                .find_by_session(&result.session_id, 10)
                .await
                .unwrap();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].content(), "Anyone there?");
        }

        #[tokio::test]
        async fn timeout_degrades_to_fallback_reply() {
            let store = Arc::new(InMemoryStore::new());
            let provider = MockInferenceProvider::new()
                .with_answer("too late")
                .with_delay(Duration::from_millis(200));
            let handler =
                handler(&store, provider).with_reply_timeout(Duration::from_millis(20));

            let result = handler.handle(command(None, "Quick one")).await.unwrap();

            assert!(!result.success);
            assert_eq!(result.reply.content(), FALLBACK_REPLY);
            assert!(result.reply.metadata().processing_time_ms.is_some());

            let messages = store
                .find_by_session(&result.session_id, 10)
                .await
                .unwrap();
            assert_eq!(messages.len(), 2);
        }

        #[tokio::test]
        async fn empty_answer_counts_as_failure() {
            let store = Arc::new(InMemoryStore::new());
            let provider = MockInferenceProvider::new().with_full_answer(InferenceAnswer {
                answer: "   ".to_string(),
                ..InferenceAnswer::default()
            });
            let handler = handler(&store, provider);

            let result = handler.handle(command(None, "Say nothing")).await.unwrap();

            assert!(!result.success);
            assert_eq!(result.reply.content(), FALLBACK_REPLY);
        }

        #[tokio::test]
        async fn retry_appends_new_turns_instead_of_mutating() {
            let store = Arc::new(InMemoryStore::new());
            let provider = MockInferenceProvider::new()
                .with_error(InferenceError::network("reset"))
                .with_answer("Second time lucky.");
            let handler = handler(&store, provider);

            let first = handler.handle(command(None, "Try this")).await.unwrap();
            assert!(!first.success);

            let second = handler
                .handle(command(Some(first.session_id), "Try this"))
                .await
                .unwrap();
            assert!(second.success);

            let messages = store
                .find_by_session(&first.session_id, 10)
                .await
                .unwrap();
            // user, fallback, user, answer
            assert_eq!(messages.len(), 4);
            assert_eq!(messages[1].content(), FALLBACK_REPLY);
            assert_eq!(messages[3].content(), "Second time lucky.");
        }
    }
}
