//! # Message Publisher
//!
//! Defines the publishing side of the bus and the in-memory broker.

use crate::message::{validate_topic, BusMessage, TopicFilter};
use crate::subscriber::Subscription;
use crate::{BusError, DEFAULT_CHANNEL_CAPACITY};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing messages to the bus.
///
/// Publishing is synchronous so that a cooperative, single-threaded caller
/// (the command dispatcher) can emit acks without an executor.
pub trait MessagePublisher: Send + Sync {
    /// Publish a message.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the message.
    ///
    /// # Errors
    ///
    /// Returns `BusError::InvalidTopic` if the topic is empty or contains
    /// wildcards.
    fn publish(&self, message: BusMessage) -> Result<usize, BusError>;

    /// Get the total number of messages published.
    fn messages_published(&self) -> u64;
}

impl<P: MessagePublisher + ?Sized> MessagePublisher for Arc<P> {
    fn publish(&self, message: BusMessage) -> Result<usize, BusError> {
        (**self).publish(message)
    }

    fn messages_published(&self) -> u64 {
        (**self).messages_published()
    }
}

/// In-memory implementation of the bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics
/// and keeps the last retained message per topic for late subscribers.
pub struct InMemoryBroker {
    /// Broadcast sender for messages.
    sender: broadcast::Sender<BusMessage>,

    /// Last retained message per topic.
    retained: Arc<RwLock<HashMap<String, BusMessage>>>,

    /// Total messages published.
    messages_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryBroker {
    /// Create a new broker with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new broker with specified capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            retained: Arc::new(RwLock::new(HashMap::new())),
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to messages matching a filter.
    ///
    /// Retained messages that match are delivered first.
    #[must_use]
    pub fn subscribe(&self, filter: TopicFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let backlog = match self.retained.read() {
            Ok(retained) => retained
                .values()
                .filter(|m| filter.matches(&m.topic))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        };

        debug!(filter = filter.pattern(), retained = backlog.len(), "New subscription created");

        Subscription::new(receiver, filter, backlog)
    }

    /// Get the retained message for a topic, if any.
    #[must_use]
    pub fn retained(&self, topic: &str) -> Option<BusMessage> {
        self.retained.read().ok()?.get(topic).cloned()
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn update_retained(&self, message: &BusMessage) {
        let Ok(mut retained) = self.retained.write() else {
            warn!(topic = %message.topic, "Retained store poisoned; message not retained");
            return;
        };
        // An empty retained payload clears the topic's retained value.
        if message.payload.is_empty() {
            retained.remove(&message.topic);
        } else {
            retained.insert(message.topic.clone(), message.clone());
        }
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagePublisher for InMemoryBroker {
    fn publish(&self, message: BusMessage) -> Result<usize, BusError> {
        validate_topic(&message.topic)?;

        self.messages_published.fetch_add(1, Ordering::Relaxed);

        if message.retain {
            self.update_retained(&message);
        }

        let topic = message.topic.clone();
        let qos = message.qos;
        match self.sender.send(message) {
            Ok(receiver_count) => {
                debug!(topic = %topic, qos = ?qos, receivers = receiver_count, "Message published");
                Ok(receiver_count)
            }
            Err(_) => {
                // No receivers - message is dropped (retained copy, if any, survives)
                warn!(topic = %topic, qos = ?qos, "Message dropped (no receivers)");
                Ok(0)
            }
        }
    }

    fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }
}
