//! # Authentication Errors
//!
//! Every variant collapses to the single `AUTH_INVALID` reason on the wire.
//! The finer cause is for local logs only.

use thiserror::Error;

/// Canonical encoding failed. Deterministic for a given input.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CanonicalError {
    /// Nesting deeper than the depth bound.
    #[error("Nesting depth {depth} exceeds maximum {max}")]
    DepthExceeded {
        /// Depth of the offending value (root is 0).
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// An object has more members than the key bound.
    #[error("Object has {count} keys, maximum is {max}")]
    TooManyKeys {
        /// Number of members in the offending object.
        count: usize,
        /// Maximum allowed members.
        max: usize,
    },

    /// NaN or infinite float.
    #[error("Non-finite float cannot be canonicalized")]
    NonFiniteFloat,
}

/// Reasons a command fails authentication.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No pre-shared key is configured for this device.
    #[error("No device secret configured")]
    SecretNotConfigured,

    /// The declared MAC algorithm is not HMAC-SHA256.
    #[error("Unsupported MAC algorithm")]
    AlgorithmUnsupported,

    /// Parameters exceed the canonical encoding bounds.
    #[error("Canonicalization overflow: {0}")]
    CanonicalizationOverflow(#[from] CanonicalError),

    /// The supplied MAC is not 64 hex characters.
    #[error("Malformed MAC hex")]
    MacDecodeError,

    /// The recomputed MAC differs from the supplied one.
    #[error("MAC mismatch")]
    MacMismatch,
}
