//! # Command Dispatch Service
//!
//! Application service implementing `CommandDispatchApi`.
//!
//! ## Algorithm
//!
//! 1. Drop deliveries for other topics, payloads over the byte bound,
//!    undecodable payloads, other schema versions and other rooms/devices
//!    (no ack). The bound is checked before decoding
//! 2. Authenticate; on failure ack `REJECTED`/`AUTH_INVALID` and stop. Not
//!    cached, so a forged duplicate is re-verified every time
//! 3. With a command id: look it up; on a hit re-emit the remembered acks
//!    without running the handler
//! 4. On a miss run the handler, remember the terminal outcome, then emit
//!    `ACCEPTED`+`COMPLETED` or `REJECTED`
//!
//! The dispatcher owns the cache, the auth service (and through it the device
//! secret) and the handler exclusively.

use crate::domain::config::DispatcherConfig;
use crate::domain::errors::ConfigError;
use crate::domain::idempotency::IdempotencyCache;
use crate::domain::outcome::{DispatchOutcome, IgnoreReason, RejectSource, TerminalOutcome};
use crate::ports::inbound::CommandDispatchApi;
use crate::ports::outbound::{AckSink, CommandHandler};
use cg_01_command_auth::CommandAuthApi;
use shared_types::{
    reason_codes, AckStatus, CommandAck, CommandEnvelope, CommandId, DeviceTopics, ReasonCode,
    SCHEMA_VERSION,
};
use tracing::{debug, info, warn};

/// Command dispatcher for one device.
pub struct CommandDispatcher<A, H, S>
where
    A: CommandAuthApi,
    H: CommandHandler,
    S: AckSink,
{
    config: DispatcherConfig,
    topics: DeviceTopics,
    auth: A,
    handler: H,
    acks: S,
    cache: IdempotencyCache,
}

impl<A, H, S> CommandDispatcher<A, H, S>
where
    A: CommandAuthApi,
    H: CommandHandler,
    S: AckSink,
{
    /// Create a dispatcher.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` does not validate.
    pub fn new(
        config: DispatcherConfig,
        auth: A,
        handler: H,
        acks: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if !auth.has_secret() {
            warn!(
                room_id = %config.room_id,
                device_id = %config.device_id,
                "No device secret configured; every command will be rejected"
            );
        }
        Ok(Self {
            topics: config.topics(),
            cache: IdempotencyCache::new(config.idempotency_capacity),
            config,
            auth,
            handler,
            acks,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Command and ack topics of this device.
    pub fn topics(&self) -> &DeviceTopics {
        &self.topics
    }

    /// Read access to the idempotency cache.
    pub fn cache(&self) -> &IdempotencyCache {
        &self.cache
    }

    /// Read access to the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Read access to the ack sink.
    pub fn ack_sink(&self) -> &S {
        &self.acks
    }

    fn routing_check(&self, command: &CommandEnvelope) -> Option<IgnoreReason> {
        if command.schema != SCHEMA_VERSION {
            return Some(IgnoreReason::SchemaMismatch);
        }
        if command.room_id != self.config.room_id || command.device_id != self.config.device_id {
            return Some(IgnoreReason::NotAddressed);
        }
        None
    }

    fn reject(
        &self,
        command: &CommandEnvelope,
        code: &str,
        source: RejectSource,
    ) -> DispatchOutcome {
        let reason = ReasonCode::truncating(code);
        self.emit(command, AckStatus::Rejected, Some(&reason));
        DispatchOutcome::Rejected { reason, source }
    }

    fn emit_outcome(&self, command: &CommandEnvelope, outcome: &TerminalOutcome) {
        for status in outcome.ack_sequence() {
            self.emit(command, *status, outcome.reason());
        }
    }

    fn emit(&self, command: &CommandEnvelope, status: AckStatus, reason: Option<&ReasonCode>) {
        let ack = CommandAck::for_command(command, status, reason);
        if let Err(e) = self.acks.emit(&ack) {
            warn!(
                command_id = %command.command_id,
                status = ?status,
                error = %e,
                "Failed to emit ack"
            );
        }
    }
}

impl<A, H, S> CommandDispatchApi for CommandDispatcher<A, H, S>
where
    A: CommandAuthApi,
    H: CommandHandler,
    S: AckSink,
{
    fn process(&mut self, topic: &str, payload: &[u8]) -> DispatchOutcome {
        if topic != self.topics.command() {
            debug!(topic, "Ignoring delivery on foreign topic");
            return DispatchOutcome::Ignored(IgnoreReason::WrongTopic);
        }

        if payload.len() > self.config.max_payload_bytes {
            warn!(
                len = payload.len(),
                max = self.config.max_payload_bytes,
                "Ignoring oversized command payload"
            );
            return DispatchOutcome::Ignored(IgnoreReason::Oversized);
        }

        let command = match CommandEnvelope::from_slice(payload) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, len = payload.len(), "Ignoring undecodable command");
                return DispatchOutcome::Ignored(IgnoreReason::Malformed);
            }
        };

        self.dispatch(&command)
    }

    fn dispatch(&mut self, command: &CommandEnvelope) -> DispatchOutcome {
        if let Some(reason) = self.routing_check(command) {
            debug!(
                schema = %command.schema,
                room_id = %command.room_id,
                device_id = %command.device_id,
                ?reason,
                "Ignoring command not addressed to this device"
            );
            return DispatchOutcome::Ignored(reason);
        }

        if self.auth.verify(command).is_err() {
            warn!(
                command_id = %command.command_id,
                correlation_id = %command.correlation_id,
                sequence = command.sequence,
                "Rejecting unauthenticated command"
            );
            return self.reject(command, reason_codes::AUTH_INVALID, RejectSource::Authentication);
        }

        let command_id = if command.has_command_id() {
            match CommandId::try_new(command.command_id.as_str()) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "Rejecting command with oversized command id");
                    return self.reject(
                        command,
                        reason_codes::INVALID_COMMAND_ID,
                        RejectSource::CommandId,
                    );
                }
            }
        } else {
            None
        };

        if let Some(id) = &command_id {
            if let Some(previous) = self.cache.lookup(id).cloned() {
                info!(
                    command_id = %id,
                    correlation_id = %command.correlation_id,
                    outcome = ?previous,
                    "Duplicate command; replaying recorded outcome"
                );
                self.emit_outcome(command, &previous);
                return DispatchOutcome::Replayed(previous);
            }
        }

        let outcome = TerminalOutcome::from(self.handler.handle(command));

        if let Some(id) = command_id {
            if let Some(evicted) = self.cache.remember(id, outcome.clone()) {
                debug!(evicted = %evicted.command_id, "Idempotency entry evicted");
            }
        }

        self.emit_outcome(command, &outcome);

        match outcome {
            TerminalOutcome::Completed => {
                info!(
                    command_id = %command.command_id,
                    correlation_id = %command.correlation_id,
                    action = %command.action,
                    "Command completed"
                );
                DispatchOutcome::Completed
            }
            TerminalOutcome::Rejected(reason) => {
                info!(
                    command_id = %command.command_id,
                    correlation_id = %command.correlation_id,
                    action = %command.action,
                    reason_code = %reason,
                    "Command rejected by handler"
                );
                DispatchOutcome::Rejected {
                    reason,
                    source: RejectSource::Handler,
                }
            }
        }
    }
}
