//! # Command-Gate Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs      # Shared command builders and keys
//! │   └── integration/     # Cross-crate flows
//! │       ├── end_to_end.rs  # Sign → verify → dispatch → ack
//! │       └── bus_flows.rs   # Device runtime over the in-memory broker
//! └── benches/
//!     └── command_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cg-tests
//!
//! # By category
//! cargo test -p cg-tests integration::end_to_end
//! cargo test -p cg-tests integration::bus_flows
//!
//! # Benchmarks
//! cargo bench -p cg-tests
//! ```

pub mod fixtures;
pub mod integration;
