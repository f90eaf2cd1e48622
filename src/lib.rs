//! Pathwise - Learning Platform Core
//!
//! This crate implements the goal progress engine (objectives, key results,
//! progress history) and the conversational session engine (AI companion and
//! knowledge Q&A) behind the Pathwise learning platform.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
