//! # Message Subscriber
//!
//! Defines the subscription side of the bus.

use crate::message::{BusMessage, TopicFilter};
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The broker was dropped.
    #[error("Message bus closed")]
    Closed,
}

/// A subscription handle for receiving messages.
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<BusMessage>,

    /// Filter for this subscription.
    filter: TopicFilter,

    /// Retained messages captured at subscribe time, delivered first.
    backlog: VecDeque<BusMessage>,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<BusMessage>,
        filter: TopicFilter,
        backlog: Vec<BusMessage>,
    ) -> Self {
        Self {
            receiver,
            filter,
            backlog: backlog.into(),
        }
    }

    /// Receive the next message whose topic matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(message)` - The next matching message
    /// - `None` - The broker was dropped
    pub async fn recv(&mut self) -> Option<BusMessage> {
        if let Some(message) = self.backlog.pop_front() {
            return Some(message);
        }

        loop {
            let message = match self.receiver.recv().await {
                Ok(m) => m,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(
                        filter = self.filter.pattern(),
                        lagged = count,
                        "Subscriber lagged, some messages dropped"
                    );
                    continue;
                }
            };

            if self.filter.matches(&message.topic) {
                return Some(message);
            }
        }
    }

    /// Try to receive the next matching message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was available and matched
    /// - `Ok(None)` - No message available (would block)
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::Closed` if the broker was dropped.
    pub fn try_recv(&mut self) -> Result<Option<BusMessage>, SubscriptionError> {
        if let Some(message) = self.backlog.pop_front() {
            return Ok(Some(message));
        }

        loop {
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some messages dropped");
                    continue;
                }
            };

            if self.filter.matches(&message.topic) {
                return Ok(Some(message));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }
}
