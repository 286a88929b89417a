//! # Dispatch Outcomes
//!
//! Per-command state machine:
//!
//! ```text
//! New ──▶ Authenticating ──┬──▶ Rejected (terminal)
//!                          └──▶ Accepted ──▶ Completed (terminal)
//! ```
//!
//! The handler runs synchronously inside one dispatch call, so `Accepted`
//! never outlives that call and is never stored.

use shared_types::{reason_codes, AckStatus, ReasonCode};

/// Decision returned by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The side effect was carried out.
    Accept,
    /// The command was refused, with an optional reason code.
    Reject(Option<ReasonCode>),
}

impl HandlerOutcome {
    /// Reject with a reason, truncated to the reason bound if needed.
    pub fn reject(reason: &str) -> Self {
        Self::Reject(Some(ReasonCode::truncating(reason)))
    }
}

/// Outcome stored in the idempotency cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome {
    /// Refused with the given reason.
    Rejected(ReasonCode),
    /// Executed to completion.
    Completed,
}

impl TerminalOutcome {
    /// Ack status sequence to emit for this outcome.
    pub fn ack_sequence(&self) -> &'static [AckStatus] {
        match self {
            Self::Rejected(_) => &[AckStatus::Rejected],
            Self::Completed => &[AckStatus::Accepted, AckStatus::Completed],
        }
    }

    /// Reason code, for rejections.
    pub fn reason(&self) -> Option<&ReasonCode> {
        match self {
            Self::Rejected(reason) => Some(reason),
            Self::Completed => None,
        }
    }
}

impl From<HandlerOutcome> for TerminalOutcome {
    fn from(outcome: HandlerOutcome) -> Self {
        match outcome {
            HandlerOutcome::Accept => Self::Completed,
            HandlerOutcome::Reject(reason) => Self::Rejected(
                reason
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| ReasonCode::truncating(reason_codes::REJECTED)),
            ),
        }
    }
}

/// Why a delivery was dropped without an ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Delivered on a topic other than this device's command topic.
    WrongTopic,
    /// Payload exceeds the configured byte bound; not decoded.
    Oversized,
    /// Payload is not a JSON object.
    Malformed,
    /// Schema tag is not `v8`.
    SchemaMismatch,
    /// Addressed to another room or device.
    NotAddressed,
}

/// Stage that produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectSource {
    /// MAC verification failed (`AUTH_INVALID`, never cached).
    Authentication,
    /// Command id too long to deduplicate (`INVALID_COMMAND_ID`, never cached).
    CommandId,
    /// The handler refused the command.
    Handler,
}

/// What a single `process`/`dispatch` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Dropped silently; no ack emitted.
    Ignored(IgnoreReason),
    /// Rejected; one `REJECTED` ack emitted.
    Rejected {
        /// Reason code sent in the ack.
        reason: ReasonCode,
        /// Stage that rejected.
        source: RejectSource,
    },
    /// Handler accepted; `ACCEPTED` and `COMPLETED` emitted.
    Completed,
    /// Duplicate of a remembered command; acks re-emitted, handler not run.
    Replayed(TerminalOutcome),
}

impl DispatchOutcome {
    /// Returns true if the handler ran during this call.
    pub fn handler_invoked(&self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::Rejected {
                    source: RejectSource::Handler,
                    ..
                }
        )
    }
}
