//! # Error Types
//!
//! Errors produced while building or decoding wire types.

use thiserror::Error;

/// A value did not fit its bounded string type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoundedStringError {
    /// The string is longer than the type allows.
    #[error("String too long: {actual} bytes > {max}")]
    TooLong {
        /// Maximum length in bytes.
        max: usize,
        /// Actual length in bytes.
        actual: usize,
    },
}

/// Errors decoding a command envelope from raw bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The payload is not a JSON document.
    #[error("Malformed command payload: {0}")]
    Malformed(String),

    /// The payload is JSON but not an object.
    #[error("Command payload is not a JSON object")]
    NotAnObject,
}
