//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Gateway
//!
//! Row-level CRUD against the named collections, one repository trait per
//! collection. No business logic lives behind these traits; they translate
//! typed operations into store queries and nothing more.
//!
//! ## Inference Backend
//!
//! - `InferenceProvider` - single bounded call to the external AI service

mod chat_message_repository;
mod chat_session_repository;
mod inference;
mod key_result_repository;
mod objective_repository;
mod progress_history_repository;
mod store;

pub use chat_message_repository::ChatMessageRepository;
pub use chat_session_repository::ChatSessionRepository;
pub use inference::{InferenceAnswer, InferenceError, InferenceProvider, InferenceRequest};
pub use key_result_repository::KeyResultRepository;
pub use objective_repository::ObjectiveRepository;
pub use progress_history_repository::ProgressHistoryRepository;
pub use store::StoreError;
