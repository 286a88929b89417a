//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Hex string has the wrong number of characters
    #[error("Invalid hex length: expected {expected} characters, got {actual}")]
    InvalidHexLength {
        /// Expected length in characters
        expected: usize,
        /// Actual length in characters
        actual: usize,
    },

    /// Hex string contains a non-hex character
    #[error("Invalid hex character at index {index}")]
    InvalidHexCharacter {
        /// Byte offset of the offending character
        index: usize,
    },
}
