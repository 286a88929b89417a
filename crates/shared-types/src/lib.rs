//! # Shared Types Crate
//!
//! Wire documents and identifiers shared by the command subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the command and ack envelopes are defined here
//!   and nowhere else.
//! - **Bounded identifiers**: dedup keys and reason codes carry their maximum
//!   size in the type (`BoundedString<N>`).
//! - **Read-only commands**: a decoded `CommandEnvelope` is never mutated on the
//!   device side.

pub mod bounded;
pub mod envelope;
pub mod errors;
pub mod topics;

pub use bounded::{BoundedString, CommandId, ReasonCode, COMMAND_ID_MAX, REASON_CODE_MAX};
pub use envelope::{
    reason_codes, AckStatus, AuthBlock, CommandAck, CommandEnvelope, SafetyState,
    SafetyStateKind, MAC_ALGORITHM, SCHEMA_VERSION,
};
pub use errors::{BoundedStringError, EnvelopeError};
pub use topics::DeviceTopics;
