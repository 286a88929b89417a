//! # Device Configuration
//!
//! Loaded from environment variables:
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `ROOM_ID` | yes | |
//! | `DEVICE_ID` | yes | |
//! | `DEVICE_HMAC_KEY_HEX` | no | none: every command is rejected |
//! | `IDEMPOTENCY_CAPACITY` | no | 16 |
//! | `BUS_CAPACITY` | no | 1000 |
//! | `RX_PAYLOAD_CAPACITY` | no | 2048 |

use cg_02_command_dispatch::{
    DispatcherConfig, DEFAULT_IDEMPOTENCY_CAPACITY, DEFAULT_MAX_PAYLOAD_BYTES,
};
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_crypto::DeviceSecret;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable names.
pub mod vars {
    /// Room identifier.
    pub const ROOM_ID: &str = "ROOM_ID";
    /// Device identifier.
    pub const DEVICE_ID: &str = "DEVICE_ID";
    /// 32-byte pre-shared key as 64 hex characters.
    pub const DEVICE_HMAC_KEY_HEX: &str = "DEVICE_HMAC_KEY_HEX";
    /// Idempotency cache slots.
    pub const IDEMPOTENCY_CAPACITY: &str = "IDEMPOTENCY_CAPACITY";
    /// Per-subscriber bus buffer.
    pub const BUS_CAPACITY: &str = "BUS_CAPACITY";
    /// Largest command payload in bytes.
    pub const RX_PAYLOAD_CAPACITY: &str = "RX_PAYLOAD_CAPACITY";
}

/// Errors loading device configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A numeric variable did not parse.
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// The resulting dispatcher config is invalid.
    #[error(transparent)]
    Dispatcher(#[from] cg_02_command_dispatch::ConfigError),
}

/// Runtime configuration of one device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Room this device belongs to.
    pub room_id: String,
    /// This device's identifier.
    pub device_id: String,
    /// Pre-shared key; `None` rejects every command.
    pub secret: Option<DeviceSecret>,
    /// Idempotency cache slots.
    pub idempotency_capacity: usize,
    /// Per-subscriber bus buffer.
    pub bus_capacity: usize,
    /// Largest command payload in bytes.
    pub max_payload_bytes: usize,
}

impl DeviceConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to read variables.
    ///
    /// An absent or malformed key is not an error: the device runs with no
    /// secret and rejects every command.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` if `ROOM_ID` or `DEVICE_ID` is unset
    /// - `ConfigError::InvalidNumber` if a capacity does not parse
    /// - `ConfigError::Dispatcher` if the ids are unusable in topic names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let number = |name: &'static str, default: usize| match lookup(name) {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidNumber { name, value: raw }),
            },
        };

        let config = Self {
            room_id: required(vars::ROOM_ID)?,
            device_id: required(vars::DEVICE_ID)?,
            secret: load_secret(lookup(vars::DEVICE_HMAC_KEY_HEX)),
            idempotency_capacity: number(vars::IDEMPOTENCY_CAPACITY, DEFAULT_IDEMPOTENCY_CAPACITY)?,
            bus_capacity: number(vars::BUS_CAPACITY, DEFAULT_CHANNEL_CAPACITY)?,
            max_payload_bytes: number(vars::RX_PAYLOAD_CAPACITY, DEFAULT_MAX_PAYLOAD_BYTES)?,
        };
        config.dispatcher_config().validate()?;
        Ok(config)
    }

    /// Dispatcher settings derived from this config.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::new(self.room_id.as_str(), self.device_id.as_str())
            .with_idempotency_capacity(self.idempotency_capacity)
            .with_max_payload_bytes(self.max_payload_bytes)
    }
}

fn load_secret(raw: Option<String>) -> Option<DeviceSecret> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        warn!("{} not set; all commands will be rejected", vars::DEVICE_HMAC_KEY_HEX);
        return None;
    };
    match DeviceSecret::from_hex(&raw) {
        Ok(secret) => {
            info!("Loaded device HMAC key from environment");
            Some(secret)
        }
        Err(e) => {
            warn!(
                error = %e,
                "{} is invalid (need 64 hex chars); all commands will be rejected",
                vars::DEVICE_HMAC_KEY_HEX
            );
            None
        }
    }
}
