//! # Device Secret
//!
//! The pre-shared HMAC key provisioned per device.
//!
//! The key bytes are wiped on drop, and `Debug` never prints them.

use crate::encoding::decode_hex_exact;
use crate::CryptoError;
use std::fmt;
use zeroize::Zeroize;

/// Device secret length in bytes.
pub const DEVICE_SECRET_LEN: usize = 32;

/// Shared secret used to authenticate commands (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct DeviceSecret([u8; DEVICE_SECRET_LEN]);

impl DeviceSecret {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; DEVICE_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a provisioned key given as 64 hex characters.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` when the hex does not encode
    /// exactly 32 bytes, and `CryptoError::InvalidHexCharacter` on bad digits.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let trimmed = input.trim();
        match decode_hex_exact::<DEVICE_SECRET_LEN>(trimmed) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(CryptoError::InvalidHexLength { actual, .. }) => {
                Err(CryptoError::InvalidKeyLength {
                    expected: DEVICE_SECRET_LEN,
                    actual: actual / 2,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; DEVICE_SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for DeviceSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceSecret([REDACTED])")
    }
}
