//! Persistence gateway failure type.
//!
//! The gateway is a thin row-level CRUD surface; the only failures it knows
//! about are the store misbehaving and rows that no longer map onto domain
//! types. Absence is not a failure at this layer: lookups return `Option`
//! and writes report whether a row was touched, leaving not-found semantics
//! to the callers that know which entity was expected.

use thiserror::Error;

/// Errors surfaced by persistence gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The underlying store rejected or failed the operation.
    #[error("store failure: {0}")]
    Database(String),

    /// A stored row could not be mapped back into a domain type.
    #[error("corrupt row: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Creates a database failure.
    pub fn database(message: impl Into<String>) -> Self {
        StoreError::Database(message.into())
    }

    /// Creates a serialization failure.
    pub fn serialization(message: impl Into<String>) -> Self {
        StoreError::Serialization(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_displays_correctly() {
        let err = StoreError::database("connection refused");
        assert_eq!(err.to_string(), "store failure: connection refused");

        let err = StoreError::serialization("unknown metric kind: ratio");
        assert_eq!(err.to_string(), "corrupt row: unknown metric kind: ratio");
    }
}
