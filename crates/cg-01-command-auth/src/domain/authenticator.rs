//! # Command Authenticator
//!
//! The single trust gate between network bytes and device actions.
//!
//! ## Checks (in order, first failure wins)
//!
//! 1. A device secret is configured
//! 2. `auth.alg` is exactly `HMAC-SHA256` (no MAC is computed otherwise)
//! 3. The parameters canonicalize within bounds
//! 4. `auth.mac_hex` is 64 hex characters
//! 5. The recomputed lowercase-hex MAC equals `auth.mac_hex` under a
//!    constant-time, full-length comparison
//!
//! The comparison runs over the hex strings, so an uppercase MAC from the
//! sender does not verify.

use super::errors::AuthError;
use super::signing::build_signing_string;
use shared_crypto::{
    constant_time_eq, decode_hex_exact, hmac_sha256, to_hex_lower, DeviceSecret, MAC_LEN,
};
use shared_types::{CommandEnvelope, MAC_ALGORITHM};
use zeroize::Zeroizing;

/// Compute the lowercase-hex MAC for a signing string.
pub fn compute_mac_hex(secret: &DeviceSecret, signing_string: &str) -> String {
    let mac = Zeroizing::new(hmac_sha256(secret.as_bytes(), signing_string.as_bytes()));
    to_hex_lower(&*mac)
}

/// Verify a command's MAC.
///
/// # Errors
///
/// Returns the first failing check as an [`AuthError`].
pub fn verify(command: &CommandEnvelope, secret: Option<&DeviceSecret>) -> Result<(), AuthError> {
    let secret = secret.ok_or(AuthError::SecretNotConfigured)?;

    if command.auth.alg != MAC_ALGORITHM {
        return Err(AuthError::AlgorithmUnsupported);
    }

    let signing_string = build_signing_string(command)?;

    let supplied = command.auth.mac_hex.as_str();
    decode_hex_exact::<MAC_LEN>(supplied).map_err(|_| AuthError::MacDecodeError)?;

    let expected = Zeroizing::new(compute_mac_hex(secret, &signing_string));
    if constant_time_eq(expected.as_bytes(), supplied.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::MacMismatch)
    }
}

/// Boolean form of [`verify`]; any failure is `false`.
pub fn is_authentic(command: &CommandEnvelope, secret: Option<&DeviceSecret>) -> bool {
    verify(command, secret).is_ok()
}
