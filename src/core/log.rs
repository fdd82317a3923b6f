//! Dispatch history tracking.
//!
//! Records every message that reached the reducer, in reduction order, so the
//! effect lifecycle of a store can be inspected after the fact.

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Record of a single reduced message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatchEntry {
    /// Unique identifier of this entry
    pub id: Uuid,
    /// The message as it reached the reducer
    pub message: Message,
    /// Nesting depth of the dispatch; 1 for externally dispatched messages
    pub depth: usize,
    /// When the reducer applied the message
    pub timestamp: DateTime<Utc>,
}

impl DispatchEntry {
    pub fn new(message: Message, depth: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            depth,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, ordered log of reduced messages.
///
/// When full, the oldest entry is evicted. A capacity of zero disables
/// recording altogether.
///
/// # Example
///
/// ```rust
/// use effect_relay::core::{mark_as_effect, DispatchEntry, DispatchLog, Message, Record};
///
/// let log = DispatchLog::with_capacity(8)
///     .record(DispatchEntry::new(Message::action(Record::new("INCREMENT")), 1))
///     .record(DispatchEntry::new(mark_as_effect(&Record::new("INCREMENT")), 2));
///
/// assert_eq!(log.entries().len(), 2);
/// assert_eq!(log.effect_count("INCREMENT"), 1);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DispatchLog {
    capacity: usize,
    entries: VecDeque<DispatchEntry>,
}

impl DispatchLog {
    /// Create a log that keeps at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// True if the log records anything at all.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Record an entry, returning the updated log.
    pub fn record(mut self, entry: DispatchEntry) -> Self {
        self.push(entry);
        self
    }

    pub(crate) fn push(&mut self, entry: DispatchEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> Vec<&DispatchEntry> {
        self.entries.iter().collect()
    }

    /// The retained messages, oldest first.
    pub fn messages(&self) -> Vec<&Message> {
        self.entries.iter().map(|e| &e.message).collect()
    }

    /// Number of retained effect carriers of the given type.
    pub fn effect_count(&self, kind: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.message.is_effect_carrier() && e.message.kind() == kind)
            .count()
    }

    /// Time between the first and last retained entry.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.front()?, self.entries.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
