//! # Command Dispatch Subsystem (CG-02)
//!
//! Turns raw command deliveries into at-most-once handler invocations and
//! acknowledgments.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): idempotency cache, outcomes, config
//! - **Ports Layer** (`ports/`): dispatch API, handler and ack sink traits
//! - **Service Layer** (`service.rs`): the dispatcher state machine
//! - **Adapters** (`adapters/`): ack publication over the shared bus
//!
//! ## Event Flow
//!
//! ```text
//! cmd topic ──bytes──▶ [Dispatcher] ──verify──▶ [CG-01 Auth]
//!                           │
//!                           ├── cache hit ──▶ replay acks
//!                           └── cache miss ─▶ [Handler] ──▶ remember ──▶ acks
//! ```
//!
//! ## Guarantees
//!
//! - A remembered command id never reaches the handler twice
//! - Authentication failures are never cached
//! - Processing is single-threaded and in delivery order

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::bus::BusAckSink;
pub use domain::config::{DispatcherConfig, DEFAULT_MAX_PAYLOAD_BYTES};
pub use domain::errors::{ConfigError, DispatchError};
pub use domain::idempotency::{IdempotencyCache, IdempotencyEntry, DEFAULT_IDEMPOTENCY_CAPACITY};
pub use domain::outcome::{
    DispatchOutcome, HandlerOutcome, IgnoreReason, RejectSource, TerminalOutcome,
};
pub use ports::inbound::CommandDispatchApi;
pub use ports::outbound::{AckSink, CommandHandler};
pub use service::CommandDispatcher;
