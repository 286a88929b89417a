//! # Command Authentication Subsystem (CG-01)
//!
//! Decides whether a received command really came from a holder of the
//! device's pre-shared key.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): canonical encoding, signing string, MAC checks
//! - **Ports Layer** (`ports/`): the `CommandAuthApi` trait
//! - **Service Layer** (`service.rs`): binds the device secret to the domain
//!
//! ## Flow
//!
//! ```text
//! CommandEnvelope ──▶ signing string ──▶ HMAC-SHA256 ──▶ hex ──▶ constant-time eq
//!                      (canonical params)   (device key)
//! ```
//!
//! ## Security Notes
//!
//! - **Fail-closed**: every error path is an authentication failure
//! - **No oracle**: callers report a single `AUTH_INVALID` reason to the sender
//! - **Bounded work**: canonical encoding caps nesting depth and object size

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::authenticator::{compute_mac_hex, is_authentic, verify};
pub use domain::canonical::{canonical_parameters, canonicalize, MAX_DEPTH, MAX_KEYS};
pub use domain::errors::{AuthError, CanonicalError};
pub use domain::signer::sign_command;
pub use domain::signing::{build_signing_string, SIGNED_FIELDS};
pub use domain::value::{CanonicalValue, Node, ValueTree};
pub use ports::inbound::CommandAuthApi;
pub use service::CommandAuthService;
