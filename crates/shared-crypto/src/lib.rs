//! # Shared Crypto - Command Authentication Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 (streaming) | Digests, HMAC inner/outer hash |
//! | `mac` | HMAC-SHA256 | Command MACs |
//! | `encoding` | hex, constant-time eq | MAC wire encoding and comparison |
//! | `secret` | 256-bit device key | Pre-shared key holding |
//!
//! ## Security Properties
//!
//! - **Self-contained SHA-256**: no platform crypto needed on the device path
//! - **Secret hygiene**: derived key material, pads and device keys are zeroed on drop
//! - **Constant-time comparison**: full-length, no early exit on mismatch

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding;
pub mod errors;
pub mod hashing;
pub mod mac;
pub mod secret;

// Re-exports
pub use encoding::{constant_time_eq, decode_hex_exact, to_hex_lower};
pub use errors::CryptoError;
pub use hashing::{sha256, Digest, Sha256};
pub use mac::{hmac_sha256, MAC_LEN};
pub use secret::DeviceSecret;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
