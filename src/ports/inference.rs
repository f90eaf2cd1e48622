//! Inference backend port.
//!
//! This port abstracts the external AI question-answering service behind a
//! single synchronous call. The conversational engine never propagates its
//! failures to callers; a timeout or transport error degrades into a
//! persisted fallback reply instead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChatSessionId, Timestamp, UserId};

/// Port for the external inference backend.
///
/// Implementations connect to the AI service and translate between its wire
/// format and the engine's types. Calls must be bounded: an implementation
/// that can hang defeats the caller's timeout budget.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Ask the backend to answer a question within one session's context.
    async fn answer(&self, request: InferenceRequest) -> Result<InferenceAnswer, InferenceError>;
}

/// A question posed to the inference backend.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest {
    /// The user's question text.
    pub question: String,
    /// User asking the question.
    pub user_id: UserId,
    /// Session the question belongs to.
    pub session_id: ChatSessionId,
    /// When the question was asked.
    pub asked_at: Timestamp,
}

impl InferenceRequest {
    /// Creates a new request stamped with the current time.
    pub fn new(question: impl Into<String>, user_id: UserId, session_id: ChatSessionId) -> Self {
        Self {
            question: question.into(),
            user_id,
            session_id,
            asked_at: Timestamp::now(),
        }
    }
}

/// A successful answer from the inference backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceAnswer {
    /// The answer text.
    pub answer: String,
    /// Model confidence, when the backend reports one.
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Follow-up suggestions, when offered.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Knowledge base entries the answer drew on.
    #[serde(default)]
    pub related_knowledge_ids: Vec<String>,
}

/// Inference backend errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    /// The call exceeded its time budget.
    #[error("inference timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The backend answered with a non-success status.
    #[error("inference backend returned status {code}")]
    Status {
        /// HTTP-style status code.
        code: u16,
    },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the backend response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl InferenceError {
    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Creates a status error.
    pub fn status(code: u16) -> Self {
        Self::Status { code }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if the failure was the time budget tripping.
    pub fn is_timeout(&self) -> bool {
        matches!(self, InferenceError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn InferenceProvider) {}
    }

    #[test]
    fn request_new_stamps_current_time() {
        let before = Timestamp::now();
        let request = InferenceRequest::new(
            "What is a trait object?",
            UserId::new("learner-1").unwrap(),
            ChatSessionId::new(),
        );
        assert!(!request.asked_at.is_before(&before));
        assert_eq!(request.question, "What is a trait object?");
    }

    #[test]
    fn answer_deserializes_with_missing_optional_fields() {
        let json = r#"{"answer": "Use dyn Trait."}"#;
        let answer: InferenceAnswer = serde_json::from_str(json).unwrap();
        assert_eq!(answer.answer, "Use dyn Trait.");
        assert_eq!(answer.confidence, None);
        assert!(answer.suggestions.is_empty());
        assert!(answer.related_knowledge_ids.is_empty());
    }

    #[test]
    fn error_displays_correctly() {
        assert_eq!(
            InferenceError::timeout(30).to_string(),
            "inference timed out after 30s"
        );
        assert_eq!(
            InferenceError::status(503).to_string(),
            "inference backend returned status 503"
        );
    }

    #[test]
    fn timeout_classification() {
        assert!(InferenceError::timeout(30).is_timeout());
        assert!(!InferenceError::status(500).is_timeout());
        assert!(!InferenceError::network("reset").is_timeout());
    }
}
