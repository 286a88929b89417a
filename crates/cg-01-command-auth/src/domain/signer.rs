//! # Command Signer
//!
//! Controller-side counterpart of the authenticator. Shares the signing
//! string builder so signer and verifier cannot drift apart.

use super::authenticator::compute_mac_hex;
use super::errors::CanonicalError;
use super::signing::build_signing_string;
use shared_crypto::DeviceSecret;
use shared_types::{AuthBlock, CommandEnvelope, MAC_ALGORITHM};

/// Compute the MAC for `command` and store it in its auth block.
///
/// Any existing auth block is replaced.
///
/// # Errors
///
/// Returns the canonicalization error if the parameters exceed its bounds;
/// the command is left untouched in that case.
pub fn sign_command(
    command: &mut CommandEnvelope,
    secret: &DeviceSecret,
) -> Result<(), CanonicalError> {
    let signing_string = build_signing_string(command)?;
    command.auth = AuthBlock {
        alg: MAC_ALGORITHM.to_owned(),
        mac_hex: compute_mac_hex(secret, &signing_string),
    };
    Ok(())
}
