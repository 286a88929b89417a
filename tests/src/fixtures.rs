//! # Test Fixtures
//!
//! Commands addressed to `room1/door1`, the keys they are signed with and
//! parameter shapes that exercise the canonicalization bounds.

use cg_01_command_auth::sign_command;
use serde_json::{json, Map, Value};
use shared_crypto::DeviceSecret;
use shared_types::CommandEnvelope;
use uuid::Uuid;

pub const ROOM_ID: &str = "room1";
pub const DEVICE_ID: &str = "door1";

/// The device's provisioned key `K`.
pub fn device_secret() -> DeviceSecret {
    DeviceSecret::from_bytes([0x42; 32])
}

/// A different key `K'`.
pub fn foreign_secret() -> DeviceSecret {
    DeviceSecret::from_bytes([0x24; 32])
}

/// A random command id, short enough to be cached.
pub fn fresh_command_id() -> String {
    Uuid::new_v4().to_string()
}

/// Unsigned command document with the given id, action and parameters.
pub fn command_value(command_id: &str, action: &str, parameters: Value) -> Value {
    json!({
        "schema": "v8",
        "room_id": ROOM_ID,
        "device_id": DEVICE_ID,
        "command_id": command_id,
        "correlation_id": format!("corr-{command_id}"),
        "sequence": 7,
        "issued_at_unix_ms": 1_700_000_000_123u64,
        "action": action,
        "safety_class": "CRITICAL",
        "parameters": parameters
    })
}

/// An `OPEN` command signed with `secret`.
pub fn signed_command(command_id: &str, secret: &DeviceSecret) -> CommandEnvelope {
    signed_action(command_id, "OPEN", json!({"duration_ms": 1500, "zone": "north"}), secret)
}

/// A command with the given action and parameters, signed with `secret`.
pub fn signed_action(
    command_id: &str,
    action: &str,
    parameters: Value,
    secret: &DeviceSecret,
) -> CommandEnvelope {
    let mut cmd = CommandEnvelope::from_value(&command_value(command_id, action, parameters));
    sign_command(&mut cmd, secret).expect("fixture parameters are within bounds");
    cmd
}

/// Serialize a command as one line of wire JSON.
pub fn to_line(cmd: &CommandEnvelope) -> String {
    serde_json::to_string(cmd).expect("envelopes always serialize")
}

/// Parameters nested `depth` objects deep below the root.
pub fn nested_parameters(depth: usize) -> Value {
    let mut value = json!(1);
    for _ in 0..depth {
        value = json!({ "n": value });
    }
    value
}

/// A flat object with `keys` members, inserted in descending key order.
pub fn wide_parameters(keys: usize) -> Value {
    let mut map = Map::new();
    for i in (0..keys).rev() {
        map.insert(format!("k{i:03}"), json!(i));
    }
    Value::Object(map)
}
