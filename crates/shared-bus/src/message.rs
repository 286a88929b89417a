//! # Bus Messages and Topic Filters
//!
//! Messages carry an opaque payload plus the delivery-quality and retention
//! parameters the publisher asked for. The bus stores them; it does not
//! interpret payloads.
//!
//! Topic filters use MQTT syntax: `/` separates levels, `+` matches exactly
//! one level, and a trailing `#` matches any remaining levels.

use crate::BusError;
use serde::{Deserialize, Serialize};

/// Requested delivery quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QoS {
    /// Fire and forget.
    AtMostOnce,
    /// Delivered at least once; receivers must tolerate duplicates.
    AtLeastOnce,
}

/// A message published on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusMessage {
    /// Destination topic (no wildcards).
    pub topic: String,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
    /// Requested delivery quality.
    pub qos: QoS,
    /// Whether the broker keeps this as the topic's last known value.
    pub retain: bool,
}

impl BusMessage {
    /// Create a non-retained message.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>, qos: QoS) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            qos,
            retain: false,
        }
    }

    /// Mark as retained.
    #[must_use]
    pub fn retained(mut self) -> Self {
        self.retain = true;
        self
    }
}

/// Validate a concrete topic name for publishing.
pub(crate) fn validate_topic(topic: &str) -> Result<(), BusError> {
    if topic.is_empty() {
        return Err(BusError::InvalidTopic {
            topic: topic.to_owned(),
            reason: "topic is empty",
        });
    }
    if topic.contains(['+', '#']) {
        return Err(BusError::InvalidTopic {
            topic: topic.to_owned(),
            reason: "wildcards are not allowed in published topics",
        });
    }
    Ok(())
}

/// Subscription filter over topic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    pattern: String,
}

impl TopicFilter {
    /// Parse a filter.
    ///
    /// # Errors
    ///
    /// Returns `BusError::InvalidFilter` if the filter is empty, if `#` is
    /// not the last level, or if a wildcard shares a level with other text.
    pub fn new(pattern: impl Into<String>) -> Result<Self, BusError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(BusError::InvalidFilter {
                filter: pattern,
                reason: "filter is empty",
            });
        }

        let levels: Vec<&str> = pattern.split('/').collect();
        for (i, level) in levels.iter().enumerate() {
            let has_wildcard = level.contains(['+', '#']);
            if has_wildcard && level.len() != 1 {
                return Err(BusError::InvalidFilter {
                    filter: pattern.clone(),
                    reason: "wildcard must occupy a whole level",
                });
            }
            if *level == "#" && i != levels.len() - 1 {
                return Err(BusError::InvalidFilter {
                    filter: pattern.clone(),
                    reason: "'#' must be the last level",
                });
            }
        }

        Ok(Self { pattern })
    }

    /// Filter that matches exactly one topic.
    ///
    /// # Errors
    ///
    /// Returns `BusError::InvalidTopic` if `topic` is not a publishable name.
    pub fn exact(topic: &str) -> Result<Self, BusError> {
        validate_topic(topic)?;
        Ok(Self {
            pattern: topic.to_owned(),
        })
    }

    /// Filter that matches every topic.
    pub fn all() -> Self {
        Self {
            pattern: "#".to_owned(),
        }
    }

    /// The filter text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether `topic` matches this filter.
    pub fn matches(&self, topic: &str) -> bool {
        let mut filter_levels = self.pattern.split('/');
        let mut topic_levels = topic.split('/');

        loop {
            match (filter_levels.next(), topic_levels.next()) {
                (Some("#"), _) => return true,
                (Some("+"), Some(_)) => continue,
                (Some(f), Some(t)) if f == t => continue,
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}
