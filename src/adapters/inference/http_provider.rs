//! HTTP implementation of the inference backend port.
//!
//! Talks to the answer service over a single JSON POST. The request carries
//! the question, the asking user, the session, and the ask timestamp; the
//! response carries the answer text plus optional confidence and knowledge
//! references.
//!
//! # Configuration
//!
//! ```ignore
//! let config = InferenceConfig::new("https://inference.internal")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = HttpInferenceProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{InferenceAnswer, InferenceError, InferenceProvider, InferenceRequest};

/// Configuration for the HTTP inference provider.
#[derive(Debug, Clone)]
pub struct InferenceBackendConfig {
    /// Base URL of the answer service.
    pub base_url: String,
    /// Optional bearer token for the service.
    api_key: Option<Secret<String>>,
    /// Request timeout; the reference ceiling is 30 seconds.
    pub timeout: Duration,
}

impl InferenceBackendConfig {
    /// Creates a new configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }
}

impl From<&crate::config::InferenceConfig> for InferenceBackendConfig {
    fn from(config: &crate::config::InferenceConfig) -> Self {
        let mut backend = Self::new(config.base_url.clone()).with_timeout(config.timeout());
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            backend = backend.with_api_key(key);
        }
        backend
    }
}

/// Wire format for the answer endpoint request.
#[derive(Debug, Serialize)]
struct AnswerRequestBody<'a> {
    question: &'a str,
    user_id: &'a str,
    session_id: String,
    timestamp: String,
}

/// Wire format for the answer endpoint response.
#[derive(Debug, Deserialize)]
struct AnswerResponseBody {
    answer: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    related_knowledge_ids: Vec<String>,
}

/// HTTP inference backend client.
pub struct HttpInferenceProvider {
    config: InferenceBackendConfig,
    client: Client,
}

impl HttpInferenceProvider {
    /// Creates a new provider with the given configuration.
    ///
    /// # Errors
    ///
    /// - `Network` if the HTTP client cannot be constructed
    pub fn new(config: InferenceBackendConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Builds the answer endpoint URL.
    fn answer_url(&self) -> String {
        format!("{}/v1/answers", self.config.base_url)
    }
}

#[async_trait]
impl InferenceProvider for HttpInferenceProvider {
    async fn answer(&self, request: InferenceRequest) -> Result<InferenceAnswer, InferenceError> {
        let body = AnswerRequestBody {
            question: &request.question,
            user_id: request.user_id.as_str(),
            session_id: request.session_id.to_string(),
            timestamp: request.asked_at.as_datetime().to_rfc3339(),
        };

        let mut builder = self
            .client
            .post(self.answer_url())
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(api_key) = self.config.api_key() {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::timeout(self.config.timeout.as_secs())
            } else if e.is_connect() {
                InferenceError::network(format!("Connection failed: {}", e))
            } else {
                InferenceError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::status(status.as_u16()));
        }

        let parsed: AnswerResponseBody = response
            .json()
            .await
            .map_err(|e| InferenceError::parse(e.to_string()))?;

        Ok(InferenceAnswer {
            answer: parsed.answer,
            confidence: parsed.confidence,
            suggestions: parsed.suggestions,
            related_knowledge_ids: parsed.related_knowledge_ids,
        })
    }
}
