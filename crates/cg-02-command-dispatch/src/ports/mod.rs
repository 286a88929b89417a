//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that the embedding application calls
//! - **Outbound (Driven)**: Handler and ack sink this subsystem needs

pub mod inbound;
pub mod outbound;
