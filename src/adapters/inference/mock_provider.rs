//! Mock inference provider for testing.
//!
//! Provides a configurable mock implementation of the InferenceProvider
//! port, allowing tests to run without calling the real answer service.
//!
//! # Features
//!
//! - Pre-configured answers (consumed in order)
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockInferenceProvider::new()
//!     .with_answer("Ownership moves values between bindings.")
//!     .with_delay(Duration::from_millis(100));
//!
//! let answer = provider.answer(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{InferenceAnswer, InferenceError, InferenceProvider, InferenceRequest};

/// A configured mock outcome.
#[derive(Debug, Clone)]
enum MockOutcome {
    Answer(InferenceAnswer),
    Error(InferenceError),
}

/// Mock inference provider for testing.
///
/// Configurable to return specific answers, simulate delays, or inject
/// errors. When the outcome queue runs dry the provider repeats the last
/// configured outcome, so single-answer setups work for any call count.
#[derive(Clone, Default)]
pub struct MockInferenceProvider {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    last: Arc<Mutex<Option<MockOutcome>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<InferenceRequest>>>,
}

impl MockInferenceProvider {
    /// Creates a new mock provider with no configured outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a plain successful answer.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.with_full_answer(InferenceAnswer {
            answer: answer.into(),
            confidence: Some(0.9),
            suggestions: Vec::new(),
            related_knowledge_ids: Vec::new(),
        })
    }

    /// Queues a fully specified successful answer.
    pub fn with_full_answer(self, answer: InferenceAnswer) -> Self {
        self.push(MockOutcome::Answer(answer));
        self
    }

    /// Queues an error outcome.
    pub fn with_error(self, error: InferenceError) -> Self {
        self.push(MockOutcome::Error(error));
        self
    }

    /// Adds simulated latency before every outcome.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the requests this provider has served, in order.
    pub fn calls(&self) -> Vec<InferenceRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, outcome: MockOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome.clone());
        *self.last.lock().unwrap() = Some(outcome);
    }

    fn next_outcome(&self) -> MockOutcome {
        if let Some(outcome) = self.outcomes.lock().unwrap().pop_front() {
            return outcome;
        }
        self.last
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(MockOutcome::Error(InferenceError::network(
                "mock provider has no configured outcome",
            )))
    }
}

#[async_trait]
impl InferenceProvider for MockInferenceProvider {
    async fn answer(&self, request: InferenceRequest) -> Result<InferenceAnswer, InferenceError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.calls.lock().unwrap().push(request);

        match self.next_outcome() {
            MockOutcome::Answer(answer) => Ok(answer),
            MockOutcome::Error(error) => Err(error),
        }
    }
}
