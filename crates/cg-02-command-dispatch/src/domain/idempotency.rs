//! # Idempotency Cache
//!
//! Bounded store of terminal command outcomes keyed by command id. Gives
//! at-most-once execution of side effects under duplicate delivery.
//!
//! ## Design
//!
//! - Fixed number of slots allocated once; no growth under load
//! - An id already resident is overwritten in place (no new slot consumed)
//! - A new id takes the slot under a wrapping cursor, evicting whatever was
//!   there: FIFO by insertion, independent of lookups
//! - Only terminal outcomes are stored; contents are lost on restart

use super::outcome::TerminalOutcome;
use shared_types::CommandId;

/// Slot count used when none is configured.
pub const DEFAULT_IDEMPOTENCY_CAPACITY: usize = 16;

/// One remembered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyEntry {
    /// Dedup key.
    pub command_id: CommandId,
    /// Recorded terminal outcome.
    pub outcome: TerminalOutcome,
}

/// Fixed-capacity FIFO ring of terminal outcomes.
#[derive(Debug, Clone)]
pub struct IdempotencyCache {
    slots: Box<[Option<IdempotencyEntry>]>,
    cursor: usize,
}

impl IdempotencyCache {
    /// Create a cache with `capacity` slots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Recorded outcome for `command_id`, if resident.
    pub fn lookup(&self, command_id: &str) -> Option<&TerminalOutcome> {
        self.position(command_id)
            .and_then(|i| self.slots[i].as_ref())
            .map(|entry| &entry.outcome)
    }

    /// Record the terminal outcome for `command_id`.
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn remember(
        &mut self,
        command_id: CommandId,
        outcome: TerminalOutcome,
    ) -> Option<IdempotencyEntry> {
        if let Some(i) = self.position(&command_id) {
            self.slots[i] = Some(IdempotencyEntry {
                command_id,
                outcome,
            });
            return None;
        }

        let slot = self.cursor;
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.slots[slot].replace(IdempotencyEntry {
            command_id,
            outcome,
        })
    }

    /// Returns true if `command_id` is resident.
    pub fn contains(&self, command_id: &str) -> bool {
        self.position(command_id).is_some()
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Drop every entry and rewind the cursor.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.cursor = 0;
    }

    fn position(&self, command_id: &str) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|entry| entry.command_id.as_str() == command_id)
        })
    }
}

impl Default for IdempotencyCache {
    fn default() -> Self {
        Self::new(DEFAULT_IDEMPOTENCY_CAPACITY)
    }
}
