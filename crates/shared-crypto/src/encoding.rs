//! # Hex Encoding and Constant-Time Comparison
//!
//! MACs travel as lowercase hex, two characters per byte. Comparison of
//! MAC material goes through [`constant_time_eq`], which inspects every byte
//! regardless of where the first difference is.

use crate::CryptoError;
use subtle::ConstantTimeEq;

/// Encode bytes as lowercase hex.
pub fn to_hex_lower(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string into exactly `N` bytes.
///
/// Accepts upper- and lowercase digits.
///
/// # Errors
///
/// - `CryptoError::InvalidHexLength` if the string is not `2 * N` characters
/// - `CryptoError::InvalidHexCharacter` if a non-hex character is present
pub fn decode_hex_exact<const N: usize>(input: &str) -> Result<[u8; N], CryptoError> {
    if input.len() != N * 2 {
        return Err(CryptoError::InvalidHexLength {
            expected: N * 2,
            actual: input.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(input, &mut out).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            CryptoError::InvalidHexCharacter { index }
        }
        _ => CryptoError::InvalidHexLength {
            expected: N * 2,
            actual: input.len(),
        },
    })?;
    Ok(out)
}

/// Compare two byte strings without an early exit on the first mismatch.
///
/// A length difference is rejected up front; lengths of MAC encodings are
/// public, the contents are not.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
