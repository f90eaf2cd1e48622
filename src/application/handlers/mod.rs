//! Command and query handlers, one per boundary operation.

pub mod chat;
pub mod goal;
