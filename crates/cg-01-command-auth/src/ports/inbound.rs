//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::errors::{AuthError, CanonicalError};
use shared_types::CommandEnvelope;

/// Command authentication API.
///
/// Implementations must be thread-safe (`Send + Sync`) and must fail closed:
/// any doubt about a command is an error, never a pass.
pub trait CommandAuthApi: Send + Sync {
    /// Verify a received command against the device secret.
    ///
    /// # Errors
    ///
    /// Returns the first failing check. Callers must not reveal the variant to
    /// the sender.
    fn verify(&self, command: &CommandEnvelope) -> Result<(), AuthError>;

    /// `true` if [`verify`](Self::verify) succeeds.
    fn is_authentic(&self, command: &CommandEnvelope) -> bool {
        self.verify(command).is_ok()
    }

    /// The exact text the command MAC covers.
    ///
    /// # Errors
    ///
    /// Fails if the parameters exceed the canonical encoding bounds.
    fn signing_string(&self, command: &CommandEnvelope) -> Result<String, CanonicalError>;

    /// Sign a command with the device secret (controller side).
    ///
    /// # Errors
    ///
    /// - `AuthError::SecretNotConfigured` if there is no secret
    /// - `AuthError::CanonicalizationOverflow` if the parameters exceed bounds
    fn sign(&self, command: &mut CommandEnvelope) -> Result<(), AuthError>;

    /// Whether a device secret is configured.
    fn has_secret(&self) -> bool;
}
