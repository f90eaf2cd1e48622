//! Application layer - request-scoped orchestration over the domain.
//!
//! Each handler is the engine-side contract of one boundary operation: it
//! receives an already-authenticated owner reference, validates input shape,
//! runs the domain rules, and talks to the ports. Handlers never authenticate
//! and never reach around the ports.

pub mod handlers;
