//! # Inbound Ports (Driving Ports / API)

use crate::domain::outcome::DispatchOutcome;
use shared_types::CommandEnvelope;

/// Command dispatch API.
///
/// Driven by a single caller in delivery order; each call runs to completion
/// before the next.
pub trait CommandDispatchApi {
    /// Handle one raw delivery from the transport.
    ///
    /// Never panics, whatever the payload.
    fn process(&mut self, topic: &str, payload: &[u8]) -> DispatchOutcome;

    /// Handle an already decoded command addressed to this device.
    fn dispatch(&mut self, command: &CommandEnvelope) -> DispatchOutcome;
}
