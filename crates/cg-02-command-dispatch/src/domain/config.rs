//! Dispatcher configuration and validation
//!
//! # Example
//!
//! ```
//! use cg_02_command_dispatch::DispatcherConfig;
//!
//! let config = DispatcherConfig::new("room1", "door1").with_idempotency_capacity(32);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.max_payload_bytes, 2048);
//! ```

use super::errors::ConfigError;
use super::idempotency::DEFAULT_IDEMPOTENCY_CAPACITY;
use serde::{Deserialize, Serialize};
use shared_types::DeviceTopics;

/// Largest command payload accepted, in bytes.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 2048;

/// Identity and limits of one dispatcher instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Room this device belongs to.
    pub room_id: String,
    /// This device's identifier.
    pub device_id: String,
    /// Slots in the idempotency cache.
    pub idempotency_capacity: usize,
    /// Payloads longer than this are dropped before decoding.
    pub max_payload_bytes: usize,
}

impl DispatcherConfig {
    /// Config with the default cache capacity and payload bound.
    pub fn new(room_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            device_id: device_id.into(),
            idempotency_capacity: DEFAULT_IDEMPOTENCY_CAPACITY,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    /// Builder-style method to set the cache capacity
    pub fn with_idempotency_capacity(mut self, capacity: usize) -> Self {
        self.idempotency_capacity = capacity;
        self
    }

    /// Builder-style method to set the payload bound
    pub fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::EmptyField` for an empty room or device id
    /// - `ConfigError::ReservedCharacter` if an id contains `/`, `+` or `#`
    /// - `ConfigError::ZeroCapacity` for a zero-slot cache
    /// - `ConfigError::ZeroPayloadBound` for a zero payload bound
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("room_id", &self.room_id), ("device_id", &self.device_id)] {
            if value.is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
            // Ids are embedded in topic names.
            if value.contains(['/', '+', '#']) {
                return Err(ConfigError::ReservedCharacter {
                    field,
                    value: value.clone(),
                });
            }
        }

        if self.idempotency_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.max_payload_bytes == 0 {
            return Err(ConfigError::ZeroPayloadBound);
        }

        Ok(())
    }

    /// Command and ack topics for this device.
    pub fn topics(&self) -> DeviceTopics {
        DeviceTopics::new(&self.room_id, &self.device_id)
    }
}
