//! # Domain Layer
//!
//! Deduplication state and dispatch decisions. No I/O.

pub mod config;
pub mod errors;
pub mod idempotency;
pub mod outcome;
