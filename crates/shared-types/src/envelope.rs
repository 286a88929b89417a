//! # Command and Ack Envelopes
//!
//! The JSON documents exchanged on a device's command and ack channels.
//!
//! ## Inbound Decoding
//!
//! Inbound commands are decoded field by field with typed defaults rather
//! than through `Deserialize`: a missing or mistyped string reads as `""`,
//! a missing, negative, fractional or mistyped number reads as `0`. The
//! signing string is built from these same values, so a sender and the
//! device agree on what was signed even for sloppy documents.

use crate::bounded::ReasonCode;
use crate::errors::EnvelopeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol schema tag carried by every document.
pub const SCHEMA_VERSION: &str = "v8";

/// The only accepted MAC algorithm identifier.
pub const MAC_ALGORITHM: &str = "HMAC-SHA256";

/// Well-known rejection reason codes.
pub mod reason_codes {
    /// Command failed authentication. Never cached.
    pub const AUTH_INVALID: &str = "AUTH_INVALID";
    /// Default when a handler rejects without a reason.
    pub const REJECTED: &str = "REJECTED";
    /// Command identifier exceeds the dedup key bound.
    pub const INVALID_COMMAND_ID: &str = "INVALID_COMMAND_ID";
    /// Action not supported by the device.
    pub const UNSUPPORTED_ACTION: &str = "UNSUPPORTED_ACTION";
}

/// Embedded authentication block `{alg, mac_hex}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthBlock {
    /// Declared MAC algorithm.
    #[serde(default)]
    pub alg: String,
    /// MAC over the signing string, lowercase hex.
    #[serde(default)]
    pub mac_hex: String,
}

/// A remotely issued command.
///
/// Read-only once received: every downstream stage borrows it immutably.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Schema tag, `v8`.
    #[serde(default)]
    pub schema: String,
    /// Target room.
    #[serde(default)]
    pub room_id: String,
    /// Target device.
    #[serde(default)]
    pub device_id: String,
    /// Deduplication key chosen by the sender.
    #[serde(default)]
    pub command_id: String,
    /// Correlation id echoed in acks.
    #[serde(default)]
    pub correlation_id: String,
    /// Sender-side sequence number (advisory only).
    #[serde(default)]
    pub sequence: u64,
    /// Issuance time in Unix milliseconds.
    #[serde(default)]
    pub issued_at_unix_ms: u64,
    /// Action name, e.g. `OPEN`.
    #[serde(default)]
    pub action: String,
    /// Safety classification, e.g. `CRITICAL`.
    #[serde(default)]
    pub safety_class: String,
    /// Arbitrarily nested action parameters (`Null` when absent).
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub parameters: Value,
    /// Authentication block.
    #[serde(default)]
    pub auth: AuthBlock,
}

impl CommandEnvelope {
    /// Decode raw bytes from the command channel.
    ///
    /// # Errors
    ///
    /// - `EnvelopeError::Malformed` if the bytes are not JSON
    /// - `EnvelopeError::NotAnObject` if the document is not an object
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(EnvelopeError::NotAnObject);
        }
        Ok(Self::from_value(&value))
    }

    /// Extract a command from a parsed document using typed defaults.
    pub fn from_value(doc: &Value) -> Self {
        let auth = doc.get("auth");
        Self {
            schema: str_or_empty(doc.get("schema")),
            room_id: str_or_empty(doc.get("room_id")),
            device_id: str_or_empty(doc.get("device_id")),
            command_id: str_or_empty(doc.get("command_id")),
            correlation_id: str_or_empty(doc.get("correlation_id")),
            sequence: u64_or_zero(doc.get("sequence")),
            issued_at_unix_ms: u64_or_zero(doc.get("issued_at_unix_ms")),
            action: str_or_empty(doc.get("action")),
            safety_class: str_or_empty(doc.get("safety_class")),
            parameters: doc.get("parameters").cloned().unwrap_or(Value::Null),
            auth: AuthBlock {
                alg: str_or_empty(auth.and_then(|a| a.get("alg"))),
                mac_hex: str_or_empty(auth.and_then(|a| a.get("mac_hex"))),
            },
        }
    }

    /// Returns true if the sender supplied a command identifier.
    pub fn has_command_id(&self) -> bool {
        !self.command_id.is_empty()
    }
}

fn str_or_empty(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn u64_or_zero(value: Option<&Value>) -> u64 {
    value.and_then(Value::as_u64).unwrap_or(0)
}

/// Ack status reported to the sender.
///
/// `Accepted` is transient; `Rejected` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckStatus {
    /// Command accepted for execution.
    Accepted,
    /// Command refused; carries a reason code.
    Rejected,
    /// Command executed.
    Completed,
}

impl AckStatus {
    /// Returns true for statuses that end a command's lifecycle.
    pub fn is_terminal(self) -> bool {
        !matches!(self, AckStatus::Accepted)
    }
}

/// Device safety condition reported alongside acks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyStateKind {
    /// Normal operation.
    Safe,
    /// Blocked by an interlock.
    Blocked,
    /// Device fault.
    Fault,
    /// Emergency stop engaged.
    EStop,
    /// Maintenance mode.
    Maintenance,
}

/// Safety state block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyState {
    /// Current safety condition.
    pub kind: SafetyStateKind,
    /// Optional reason for a non-safe condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    /// Whether the condition is latched.
    pub latched: bool,
}

impl SafetyState {
    /// The unlatched `SAFE` state.
    pub fn safe() -> Self {
        Self {
            kind: SafetyStateKind::Safe,
            reason_code: None,
            latched: false,
        }
    }
}

impl Default for SafetyState {
    fn default() -> Self {
        Self::safe()
    }
}

/// Acknowledgment published on the ack channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    /// Schema tag, `v8`.
    pub schema: String,
    /// Room of the acknowledging device.
    pub room_id: String,
    /// Acknowledging device.
    pub device_id: String,
    /// Echo of the command identifier (empty when absent).
    pub command_id: String,
    /// Echo of the correlation id (empty when absent).
    pub correlation_id: String,
    /// Ack status.
    pub status: AckStatus,
    /// Reason code, present only on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    /// Safety state at ack time.
    pub safety_state: SafetyState,
    /// Observation time in Unix milliseconds (0 when no clock is available).
    pub observed_at_unix_ms: u64,
}

impl CommandAck {
    /// Ack for `command` with the given status.
    ///
    /// `reason` is only recorded for `Rejected`.
    pub fn for_command(
        command: &CommandEnvelope,
        status: AckStatus,
        reason: Option<&ReasonCode>,
    ) -> Self {
        let reason_code = match status {
            AckStatus::Rejected => Some(
                reason
                    .map(|r| r.as_str().to_owned())
                    .unwrap_or_else(|| reason_codes::REJECTED.to_owned()),
            ),
            AckStatus::Accepted | AckStatus::Completed => None,
        };
        Self {
            schema: SCHEMA_VERSION.to_owned(),
            room_id: command.room_id.clone(),
            device_id: command.device_id.clone(),
            command_id: command.command_id.clone(),
            correlation_id: command.correlation_id.clone(),
            status,
            reason_code,
            safety_state: SafetyState::safe(),
            observed_at_unix_ms: 0,
        }
    }

    /// Set the observation timestamp.
    pub fn observed_at(mut self, unix_ms: u64) -> Self {
        self.observed_at_unix_ms = unix_ms;
        self
    }
}
