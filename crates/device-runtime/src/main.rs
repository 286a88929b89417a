//! # Device Runtime
//!
//! Reads signed commands from stdin, one JSON document per line, and writes
//! acknowledgments to stdout. Logs go to stderr; set `RUST_LOG` to adjust.

use anyhow::{Context, Result};
use device_runtime::{DeviceConfig, DeviceRuntime};
use tokio::io::{self, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = DeviceConfig::from_env().context("Failed to load device configuration")?;
    info!(
        room_id = %config.room_id,
        device_id = %config.device_id,
        "Starting device runtime"
    );

    let mut runtime = DeviceRuntime::new(config)?;
    let input = BufReader::new(io::stdin());
    let output = io::stdout();

    tokio::select! {
        summary = runtime.run(input, output) => {
            let summary = summary?;
            info!(
                published = summary.published,
                completed = summary.completed,
                rejected = summary.rejected,
                replayed = summary.replayed,
                ignored = summary.ignored,
                acks = summary.acks_written,
                "Device runtime finished"
            );
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            warn!("Shutdown signal received");
        }
    }

    Ok(())
}
