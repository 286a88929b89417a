//! # Device Topics
//!
//! Channel names for one device: `room/{room_id}/device/{device_id}/{leaf}`.

/// Command and ack channel names for a single device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTopics {
    command: String,
    ack: String,
}

impl DeviceTopics {
    /// Build the channel names for `device_id` in `room_id`.
    pub fn new(room_id: &str, device_id: &str) -> Self {
        let base = format!("room/{room_id}/device/{device_id}");
        Self {
            command: format!("{base}/cmd"),
            ack: format!("{base}/ack"),
        }
    }

    /// Inbound command channel.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Outbound ack channel.
    pub fn ack(&self) -> &str {
        &self.ack
    }
}
