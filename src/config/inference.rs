//! Inference backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Inference backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the answer service
    pub base_url: String,

    /// Optional bearer token for the service
    pub api_key: Option<String>,

    /// Request timeout in seconds; 30 is the reference ceiling
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl InferenceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate inference configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("INFERENCE_BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidInferenceUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
