//! # Domain Layer
//!
//! Pure encoding and MAC logic with no I/O dependencies.

pub mod authenticator;
pub mod canonical;
pub mod errors;
pub mod signer;
pub mod signing;
pub mod value;
