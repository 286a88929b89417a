//! # Shared Bus - Topic-Based Message Bus
//!
//! In-process publish/subscribe transport that stands in for the MQTT broker
//! devices talk to. Commands arrive on `room/{room}/device/{device}/cmd` and
//! acknowledgements leave on `room/{room}/device/{device}/ack`.
//!
//! ```text
//! ┌──────────────┐  publish()   ┌──────────────┐  subscribe()  ┌──────────────┐
//! │  Controller  │ ───────────▶ │    Broker    │ ────────────▶ │    Device    │
//! │              │ ◀─────────── │  (broadcast) │ ◀──────────── │  Dispatcher  │
//! └──────────────┘    acks      └──────────────┘    publish()  └──────────────┘
//! ```
//!
//! ## Delivery
//!
//! - Topic filters follow MQTT syntax (`+` one level, `#` remainder).
//! - `QoS::AtLeastOnce` is recorded on each message; receivers must tolerate
//!   duplicate delivery.
//! - Retained messages are replayed to new subscribers; an empty retained
//!   payload clears the topic.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod message;
pub mod publisher;
pub mod subscriber;

use thiserror::Error;

pub use message::{BusMessage, QoS, TopicFilter};
pub use publisher::{InMemoryBroker, MessagePublisher};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum messages buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Errors from publishing or subscribing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Topic cannot be published to.
    #[error("Invalid topic '{topic}': {reason}")]
    InvalidTopic {
        /// The offending topic.
        topic: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Subscription filter is malformed.
    #[error("Invalid topic filter '{filter}': {reason}")]
    InvalidFilter {
        /// The offending filter.
        filter: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
