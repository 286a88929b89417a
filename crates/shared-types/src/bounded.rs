//! # Bounded Strings
//!
//! Owned strings whose maximum byte length is part of the type.
//!
//! The dedup cache stores command identifiers and reason codes; carrying the
//! bound in the type keeps every cache slot a known maximum size.

use crate::errors::BoundedStringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Maximum byte length of a command identifier (a UUID string plus slack).
pub const COMMAND_ID_MAX: usize = 39;

/// Maximum byte length of a rejection reason code.
pub const REASON_CODE_MAX: usize = 31;

/// Command identifier used as the opaque deduplication key.
pub type CommandId = BoundedString<COMMAND_ID_MAX>;

/// Machine-readable rejection reason, e.g. `AUTH_INVALID`.
pub type ReasonCode = BoundedString<REASON_CODE_MAX>;

/// A UTF-8 string of at most `MAX` bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundedString<const MAX: usize>(String);

impl<const MAX: usize> BoundedString<MAX> {
    /// Maximum length in bytes.
    pub const MAX_LEN: usize = MAX;

    /// Create from a string that must already fit.
    ///
    /// # Errors
    ///
    /// Returns `BoundedStringError::TooLong` when `value` exceeds `MAX` bytes.
    pub fn try_new(value: impl Into<String>) -> Result<Self, BoundedStringError> {
        let value = value.into();
        if value.len() > MAX {
            return Err(BoundedStringError::TooLong {
                max: MAX,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }

    /// Create from any string, cutting it on a character boundary if needed.
    pub fn truncating(value: &str) -> Self {
        if value.len() <= MAX {
            return Self(value.to_owned());
        }
        let mut end = MAX;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        Self(value[..end].to_owned())
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const MAX: usize> Deref for BoundedString<MAX> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> fmt::Display for BoundedString<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const MAX: usize> TryFrom<String> for BoundedString<MAX> {
    type Error = BoundedStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl<const MAX: usize> TryFrom<&str> for BoundedString<MAX> {
    type Error = BoundedStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl<const MAX: usize> From<BoundedString<MAX>> for String {
    fn from(value: BoundedString<MAX>) -> Self {
        value.0
    }
}

impl<const MAX: usize> PartialEq<str> for BoundedString<MAX> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<const MAX: usize> PartialEq<&str> for BoundedString<MAX> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
