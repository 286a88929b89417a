//! # Dispatch Errors

use thiserror::Error;

/// Invalid dispatcher configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required identifier is empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// An identifier contains a topic separator or wildcard.
    #[error("{field} contains a reserved topic character: {value}")]
    ReservedCharacter {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The idempotency cache needs at least one slot.
    #[error("idempotency_capacity must be at least 1")]
    ZeroCapacity,

    /// The payload bound must admit at least one byte.
    #[error("max_payload_bytes must be at least 1")]
    ZeroPayloadBound,
}

/// Errors surfaced by dispatcher collaborators.
///
/// None of these change the outcome of a command; they are logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The ack could not be serialized.
    #[error("Failed to encode ack: {0}")]
    AckEncoding(String),

    /// The transport refused the ack.
    #[error("Failed to publish ack: {0}")]
    AckPublish(String),
}
