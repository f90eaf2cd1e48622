//! Inference backend adapters.

mod http_provider;
mod mock_provider;

pub use http_provider::{HttpInferenceProvider, InferenceBackendConfig};
pub use mock_provider::MockInferenceProvider;
