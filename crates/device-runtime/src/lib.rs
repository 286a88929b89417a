//! # Device Runtime Library
//!
//! Hosts one controllable device: loads configuration, attaches the command
//! dispatcher to an in-memory broker and feeds it newline-delimited commands.
//! The binary in `main.rs` runs it over stdin and stdout.
//!
//! ## Wiring
//!
//! - [`config`]: environment-driven [`DeviceConfig`]
//! - [`handler`]: built-in [`ActionHandler`]
//! - [`runtime`]: [`DeviceRuntime`] event loop

pub mod config;
pub mod handler;
pub mod runtime;

pub use config::{ConfigError, DeviceConfig};
pub use handler::{ActionHandler, ExecutedAction, EXECUTION_LOG_CAPACITY, SUPPORTED_ACTIONS};
pub use runtime::{DeviceRuntime, RunSummary};
