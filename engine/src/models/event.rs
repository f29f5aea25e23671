//! Event logging for board operations
//!
//! Every state change on the board appends a typed event. The log enables:
//! - Auditing (who was called/started/canceled, and when)
//! - Debugging (reconstruct how the queue reached its current shape)
//! - Host integration (push "what changed since t" to displays)
//!
//! Estimation runs are pure reads and deliberately log nothing.

use crate::core::time::Millis;

/// Board event capturing one state change.
///
/// All events carry the operation timestamp supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Party joined the waiting queue
    Joined {
        at: Millis,
        entry_id: String,
        name: String,
        lanes_needed: u32,
    },

    /// Party called up; lanes reserved for the hold window
    Called { at: Millis, entry_id: String },

    /// Party started playing
    Started { at: Millis, entry_id: String },

    /// Party finished; lanes freed
    Completed { at: Millis, entry_id: String },

    /// Party removed before starting
    Canceled { at: Millis, entry_id: String },

    /// Called party returned to its old queue position
    Requeued { at: Millis, entry_id: String },

    /// Waiting party explicitly moved ahead of another
    Reordered {
        at: Millis,
        entry_id: String,
        before_id: String,
    },
}

impl Event {
    /// Timestamp of the event
    pub fn at(&self) -> Millis {
        match self {
            Event::Joined { at, .. }
            | Event::Called { at, .. }
            | Event::Started { at, .. }
            | Event::Completed { at, .. }
            | Event::Canceled { at, .. }
            | Event::Requeued { at, .. }
            | Event::Reordered { at, .. } => *at,
        }
    }

    /// Id of the entry the event concerns
    pub fn entry_id(&self) -> &str {
        match self {
            Event::Joined { entry_id, .. }
            | Event::Called { entry_id, .. }
            | Event::Started { entry_id, .. }
            | Event::Completed { entry_id, .. }
            | Event::Canceled { entry_id, .. }
            | Event::Requeued { entry_id, .. }
            | Event::Reordered { entry_id, .. } => entry_id,
        }
    }
}

/// Append-only log of board events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// All events, in append order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of logged events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events concerning one entry
    pub fn events_for_entry(&self, entry_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.entry_id() == entry_id)
            .collect()
    }

    /// Events at or after a timestamp
    pub fn events_since(&self, at: Millis) -> Vec<&Event> {
        self.events.iter().filter(|e| e.at() >= at).collect()
    }
}
