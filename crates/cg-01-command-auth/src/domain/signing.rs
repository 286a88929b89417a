//! # Signing String
//!
//! The exact text a command MAC is computed over: newline-joined `key=value`
//! lines in a fixed order, no trailing newline.
//!
//! ```text
//! schema=v8
//! room_id=room1
//! device_id=door1
//! command_id=...
//! correlation_id=...
//! sequence=7
//! issued_at_unix_ms=1700000000000
//! action=OPEN
//! safety_class=CRITICAL
//! parameters={"speed":2}
//! ```
//!
//! Field names and order are a compatibility contract with remote signers.

use super::canonical::canonical_parameters;
use super::errors::CanonicalError;
use shared_types::CommandEnvelope;

/// Signed field names, in signing order. `parameters` is always last.
pub const SIGNED_FIELDS: [&str; 10] = [
    "schema",
    "room_id",
    "device_id",
    "command_id",
    "correlation_id",
    "sequence",
    "issued_at_unix_ms",
    "action",
    "safety_class",
    "parameters",
];

/// Build the signing string for a command.
///
/// Absent text fields appear as empty values and absent numbers as `0`;
/// the envelope already carries those defaults.
///
/// # Errors
///
/// Returns the canonicalization error if the parameters exceed its bounds.
pub fn build_signing_string(command: &CommandEnvelope) -> Result<String, CanonicalError> {
    let parameters = canonical_parameters(&command.parameters)?;
    let sequence = command.sequence.to_string();
    let issued_at = command.issued_at_unix_ms.to_string();

    let values: [&str; 10] = [
        &command.schema,
        &command.room_id,
        &command.device_id,
        &command.command_id,
        &command.correlation_id,
        &sequence,
        &issued_at,
        &command.action,
        &command.safety_class,
        &parameters,
    ];

    let len = SIGNED_FIELDS
        .iter()
        .zip(values)
        .map(|(name, value)| name.len() + value.len() + 2)
        .sum();
    let mut out = String::with_capacity(len);
    for (i, (name, value)) in SIGNED_FIELDS.iter().zip(values).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }
    Ok(out)
}
