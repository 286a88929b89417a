//! # Device Runtime
//!
//! Wires the in-memory broker, the dispatcher and the built-in handler.
//!
//! ```text
//! input lines ──publish──▶ cmd topic ──▶ [Dispatcher] ──acks──▶ ack topic ──▶ output lines
//! ```
//!
//! Each input line is published, then the command subscription is drained
//! through the dispatcher and the ack subscription is drained to the output,
//! all on the calling task. Commands are handled strictly in input order.

use crate::config::DeviceConfig;
use crate::handler::ActionHandler;
use anyhow::{Context, Result};
use cg_01_command_auth::CommandAuthService;
use cg_02_command_dispatch::{BusAckSink, CommandDispatchApi, CommandDispatcher, DispatchOutcome};
use shared_bus::{BusMessage, InMemoryBroker, MessagePublisher, QoS, Subscription, TopicFilter};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, info};

type DeviceDispatcher =
    CommandDispatcher<CommandAuthService, ActionHandler, BusAckSink<Arc<InMemoryBroker>>>;

/// Counters for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-blank input lines published.
    pub published: u64,
    /// Deliveries dropped without an ack.
    pub ignored: u64,
    /// Commands rejected (auth, id or handler).
    pub rejected: u64,
    /// Commands completed by the handler.
    pub completed: u64,
    /// Duplicates answered from the idempotency cache.
    pub replayed: u64,
    /// Ack lines written to the output.
    pub acks_written: u64,
}

impl RunSummary {
    fn record(&mut self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Ignored(_) => self.ignored += 1,
            DispatchOutcome::Rejected { .. } => self.rejected += 1,
            DispatchOutcome::Completed => self.completed += 1,
            DispatchOutcome::Replayed(_) => self.replayed += 1,
        }
    }
}

/// A single device attached to an in-memory broker.
pub struct DeviceRuntime {
    broker: Arc<InMemoryBroker>,
    dispatcher: DeviceDispatcher,
    commands: Subscription,
    acks: Subscription,
}

impl DeviceRuntime {
    /// Build the runtime from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the dispatcher configuration is invalid.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let broker = Arc::new(InMemoryBroker::with_capacity(config.bus_capacity));
        let dispatcher_config = config.dispatcher_config();
        let topics = dispatcher_config.topics();

        let commands = broker.subscribe(
            TopicFilter::exact(topics.command()).context("Invalid command topic")?,
        );
        let acks = broker.subscribe(TopicFilter::exact(topics.ack()).context("Invalid ack topic")?);

        let dispatcher = CommandDispatcher::new(
            dispatcher_config,
            CommandAuthService::from_optional(config.secret),
            ActionHandler::new(),
            BusAckSink::new(Arc::clone(&broker), topics.ack()),
        )
        .context("Invalid dispatcher configuration")?;

        info!(
            command_topic = topics.command(),
            ack_topic = topics.ack(),
            idempotency_capacity = config.idempotency_capacity,
            max_payload_bytes = config.max_payload_bytes,
            "Device runtime ready"
        );

        Ok(Self {
            broker,
            dispatcher,
            commands,
            acks,
        })
    }

    /// The broker, for attaching extra publishers or subscribers.
    pub fn broker(&self) -> Arc<InMemoryBroker> {
        Arc::clone(&self.broker)
    }

    /// Actions executed so far.
    pub fn handler(&self) -> &ActionHandler {
        self.dispatcher.handler()
    }

    /// Publish one raw command on this device's command topic.
    ///
    /// # Errors
    ///
    /// Fails if the broker rejects the topic.
    pub fn submit(&self, payload: impl Into<Vec<u8>>) -> Result<()> {
        let topic = self.dispatcher.topics().command();
        self.broker
            .publish(BusMessage::new(topic, payload, QoS::AtLeastOnce))
            .context("Failed to publish command")?;
        Ok(())
    }

    /// Handle every pending command delivery.
    pub fn pump(&mut self, summary: &mut RunSummary) {
        while let Ok(Some(message)) = self.commands.try_recv() {
            let outcome = self.dispatcher.process(&message.topic, &message.payload);
            debug!(?outcome, "Delivery processed");
            summary.record(&outcome);
        }
    }

    /// Write every pending ack to `output`, one JSON document per line.
    ///
    /// # Errors
    ///
    /// Fails if writing to `output` fails.
    pub async fn flush_acks<W>(&mut self, output: &mut W, summary: &mut RunSummary) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while let Ok(Some(message)) = self.acks.try_recv() {
            output.write_all(&message.payload).await.context("Failed to write ack")?;
            output.write_all(b"\n").await.context("Failed to write ack")?;
            summary.acks_written += 1;
        }
        output.flush().await.context("Failed to flush acks")?;
        Ok(())
    }

    /// Read newline-delimited commands from `input` until EOF, writing acks to
    /// `output`.
    ///
    /// # Errors
    ///
    /// Fails on an I/O error reading input or writing acks.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut summary = RunSummary::default();
        let mut lines = LinesStream::new(input.lines());

        while let Some(line) = lines.next().await {
            let line = line.context("Failed to read command input")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            self.submit(line.as_bytes())?;
            summary.published += 1;

            self.pump(&mut summary);
            self.flush_acks(&mut output, &mut summary).await?;
        }

        info!(
            published = summary.published,
            completed = summary.completed,
            rejected = summary.rejected,
            replayed = summary.replayed,
            ignored = summary.ignored,
            "Input exhausted"
        );
        Ok(summary)
    }
}
