//! Bounded alert log
//!
//! Newest entries sit at the front. The log never holds more than its
//! capacity; inserting past it evicts the oldest (back) entry.

mod synth;

pub(crate) use synth::format_clock;
pub use synth::{AlertSynthesizer, CANNED_ALERTS};

use serde::Serialize;
use std::collections::VecDeque;

/// Default number of alerts kept on screen
pub const DEFAULT_CAPACITY: usize = 5;

/// Where an alert came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertOrigin {
    /// Part of a metrics snapshot
    Feed,
    /// Synthesized locally from the canned pool
    Local,
}

/// One line in the alert log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEntry {
    pub text: String,
    /// Local wall-clock time the entry was created, already formatted
    pub timestamp: String,
    pub origin: AlertOrigin,
}

impl AlertEntry {
    pub fn from_feed(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: timestamp.into(),
            origin: AlertOrigin::Feed,
        }
    }

    pub fn local(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: timestamp.into(),
            origin: AlertOrigin::Local,
        }
    }

    /// Display line: feed alerts show only the text, local ones carry their time.
    pub fn render(&self) -> String {
        match self.origin {
            AlertOrigin::Feed => format!("⚠️ {}", self.text),
            AlertOrigin::Local => format!("⚠️ {} — {}", self.text, self.timestamp),
        }
    }
}

/// Capped, newest-first alert list
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<AlertEntry>,
    capacity: usize,
}

impl AlertLog {
    /// Creates an empty log. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert at the front. Returns the evicted entry if the cap was exceeded.
    pub fn prepend(&mut self, entry: AlertEntry) -> Option<AlertEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Discard everything and take the given entries in order.
    ///
    /// Entries beyond the capacity are dropped from the tail.
    pub fn replace_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = AlertEntry>,
    {
        self.entries.clear();
        self.entries
            .extend(entries.into_iter().take(self.capacity));
    }

    /// Entries newest first
    pub fn iter(&self) -> impl Iterator<Item = &AlertEntry> {
        self.entries.iter()
    }

    /// Display lines newest first
    pub fn rendered(&self) -> Vec<String> {
        self.entries.iter().map(AlertEntry::render).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
