//! Adapters - Implementations of the ports.
//!
//! - `postgres` - sqlx-backed persistence gateway
//! - `memory` - in-memory persistence gateway for tests and local runs
//! - `inference` - HTTP client and mock for the inference backend

pub mod inference;
pub mod memory;
pub mod postgres;
