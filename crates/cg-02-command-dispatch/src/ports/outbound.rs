//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies the dispatcher needs from the embedding application.

use crate::domain::errors::DispatchError;
use crate::domain::outcome::HandlerOutcome;
use shared_types::{CommandAck, CommandEnvelope};

/// Executes authenticated commands.
///
/// Called at most once per remembered command id. Must finish the side
/// effect before returning; there is no asynchronous completion.
pub trait CommandHandler {
    /// Carry out `command` and report the decision.
    fn handle(&mut self, command: &CommandEnvelope) -> HandlerOutcome;
}

impl<F> CommandHandler for F
where
    F: FnMut(&CommandEnvelope) -> HandlerOutcome,
{
    fn handle(&mut self, command: &CommandEnvelope) -> HandlerOutcome {
        self(command)
    }
}

/// Sends acknowledgments back to the command sender.
pub trait AckSink {
    /// Emit one ack.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if the ack could not be encoded or sent. The
    /// dispatcher logs the failure; the command outcome stands.
    fn emit(&self, ack: &CommandAck) -> Result<(), DispatchError>;
}

impl<S: AckSink + ?Sized> AckSink for &S {
    fn emit(&self, ack: &CommandAck) -> Result<(), DispatchError> {
        (**self).emit(ack)
    }
}
