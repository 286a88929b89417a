//! # Command Authentication Service
//!
//! Application service that implements `CommandAuthApi` over the device's
//! pre-shared secret and delegates to the domain layer.

use crate::domain::authenticator;
use crate::domain::errors::{AuthError, CanonicalError};
use crate::domain::signer::sign_command;
use crate::domain::signing::build_signing_string;
use crate::ports::inbound::CommandAuthApi;
use shared_crypto::DeviceSecret;
use shared_types::CommandEnvelope;
use tracing::debug;

/// Command authentication service.
///
/// Holds the device secret for its whole lifetime; the secret is zeroed when
/// the service is dropped.
pub struct CommandAuthService {
    secret: Option<DeviceSecret>,
}

impl CommandAuthService {
    /// Create a service with a configured secret.
    pub fn new(secret: DeviceSecret) -> Self {
        Self {
            secret: Some(secret),
        }
    }

    /// Create a service with no secret. Every command fails authentication.
    pub fn without_secret() -> Self {
        Self { secret: None }
    }

    /// Create from an optional secret.
    pub fn from_optional(secret: Option<DeviceSecret>) -> Self {
        Self { secret }
    }
}

impl CommandAuthApi for CommandAuthService {
    fn verify(&self, command: &CommandEnvelope) -> Result<(), AuthError> {
        let result = authenticator::verify(command, self.secret.as_ref());
        if let Err(ref cause) = result {
            debug!(
                command_id = %command.command_id,
                correlation_id = %command.correlation_id,
                %cause,
                "Command failed authentication"
            );
        }
        result
    }

    fn signing_string(&self, command: &CommandEnvelope) -> Result<String, CanonicalError> {
        build_signing_string(command)
    }

    fn sign(&self, command: &mut CommandEnvelope) -> Result<(), AuthError> {
        let secret = self.secret.as_ref().ok_or(AuthError::SecretNotConfigured)?;
        sign_command(command, secret)?;
        Ok(())
    }

    fn has_secret(&self) -> bool {
        self.secret.is_some()
    }
}
