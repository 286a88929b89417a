//! # Built-in Action Handler
//!
//! Stand-in for device hardware: accepts a fixed set of actions and records
//! the most recent ones it executed.

use cg_02_command_dispatch::{CommandHandler, HandlerOutcome};
use shared_types::{reason_codes, CommandEnvelope};
use std::collections::VecDeque;
use tracing::{info, warn};

/// Actions the built-in handler carries out.
pub const SUPPORTED_ACTIONS: [&str; 4] = ["OPEN", "CLOSE", "MOVE", "SET"];

/// Executed actions kept in the log; older ones are dropped.
pub const EXECUTION_LOG_CAPACITY: usize = 64;

/// One executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedAction {
    /// Command id (empty when absent).
    pub command_id: String,
    /// Action name.
    pub action: String,
}

/// Handler for [`SUPPORTED_ACTIONS`].
#[derive(Debug, Default)]
pub struct ActionHandler {
    executed: VecDeque<ExecutedAction>,
    executed_total: u64,
}

impl ActionHandler {
    /// Create a handler with an empty execution log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent executed commands, oldest first.
    pub fn executed(&self) -> &VecDeque<ExecutedAction> {
        &self.executed
    }

    /// Commands executed over the handler's lifetime.
    pub fn executed_total(&self) -> u64 {
        self.executed_total
    }
}

impl CommandHandler for ActionHandler {
    fn handle(&mut self, command: &CommandEnvelope) -> HandlerOutcome {
        if !SUPPORTED_ACTIONS.contains(&command.action.as_str()) {
            warn!(
                command_id = %command.command_id,
                action = %command.action,
                "Unsupported action"
            );
            return HandlerOutcome::reject(reason_codes::UNSUPPORTED_ACTION);
        }

        info!(
            command_id = %command.command_id,
            action = %command.action,
            safety_class = %command.safety_class,
            parameters = %command.parameters,
            "Executing action"
        );
        if self.executed.len() == EXECUTION_LOG_CAPACITY {
            self.executed.pop_front();
        }
        self.executed.push_back(ExecutedAction {
            command_id: command.command_id.clone(),
            action: command.action.clone(),
        });
        self.executed_total += 1;
        HandlerOutcome::Accept
    }
}
