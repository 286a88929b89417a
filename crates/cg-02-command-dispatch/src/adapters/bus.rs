//! # Bus Ack Adapter
//!
//! Publishes acks as JSON on the device's ack topic.
//!
//! ```text
//! [Dispatcher] ──CommandAck──▶ BusAckSink ──JSON──▶ room/{r}/device/{d}/ack
//!                                                    (QoS 1, not retained)
//! ```

use crate::domain::errors::DispatchError;
use crate::ports::outbound::AckSink;
use shared_bus::{BusMessage, MessagePublisher, QoS};
use shared_types::CommandAck;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Ack sink backed by a bus publisher.
pub struct BusAckSink<P: MessagePublisher> {
    /// Shared bus publisher.
    publisher: P,

    /// Topic acks are published on.
    topic: String,
}

impl<P: MessagePublisher> BusAckSink<P> {
    /// Create a sink publishing on `topic`.
    pub fn new(publisher: P, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    /// Ack topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl<P: MessagePublisher> AckSink for BusAckSink<P> {
    fn emit(&self, ack: &CommandAck) -> Result<(), DispatchError> {
        let stamped = ack.clone().observed_at(unix_millis());
        let payload =
            serde_json::to_vec(&stamped).map_err(|e| DispatchError::AckEncoding(e.to_string()))?;

        let receivers = self
            .publisher
            .publish(BusMessage::new(self.topic.as_str(), payload, QoS::AtLeastOnce))
            .map_err(|e| DispatchError::AckPublish(e.to_string()))?;

        debug!(
            topic = %self.topic,
            command_id = %stamped.command_id,
            status = ?stamped.status,
            receivers,
            "Ack published"
        );
        Ok(())
    }
}

/// Wall-clock milliseconds, 0 if the clock is before the epoch.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
