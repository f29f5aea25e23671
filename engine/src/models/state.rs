//! Waitlist state
//!
//! Registry of every entry on the board, plus the two derived views the
//! estimator consumes: the ordered waiting queue and the set of parties
//! currently holding lanes.
//!
//! # Critical Invariants
//!
//! 1. **Entry Uniqueness**: Each entry id appears exactly once
//! 2. **Key Stability**: Derivations read order keys, never write them
//! 3. **Snapshot Semantics**: Derived views are fresh copies; the estimator
//!    cannot mutate the registry through them

use std::collections::HashMap;

use crate::board::WaitlistSettings;
use crate::estimator::{ActiveOccupant, QueuedParty};
use crate::models::entry::WaitlistEntry;

/// Registry of all entries on the board
#[derive(Debug, Clone, Default)]
pub struct WaitlistState {
    /// All entries, indexed by id
    entries: HashMap<String, WaitlistEntry>,
}

impl WaitlistState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the registry
    ///
    /// # Panics
    ///
    /// Panics if the entry id already exists. Duplicate ids coming in from a
    /// stored snapshot are rejected earlier, with an error, during restore.
    pub fn add_entry(&mut self, entry: WaitlistEntry) {
        let id = entry.id().to_string();
        assert!(
            !self.entries.contains_key(&id),
            "Entry id {} already exists",
            id
        );
        self.entries.insert(id, entry);
    }

    /// Get an entry by id
    pub fn get_entry(&self, id: &str) -> Option<&WaitlistEntry> {
        self.entries.get(id)
    }

    /// Get a mutable entry by id
    pub fn get_entry_mut(&mut self, id: &str) -> Option<&mut WaitlistEntry> {
        self.entries.get_mut(id)
    }

    /// All entries, indexed by id
    pub fn entries(&self) -> &HashMap<String, WaitlistEntry> {
        &self.entries
    }

    /// Mutable access to all entries
    pub fn entries_mut(&mut self) -> &mut HashMap<String, WaitlistEntry> {
        &mut self.entries
    }

    /// Number of entries in the registry (any status)
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Number of parties currently waiting
    pub fn num_waiting(&self) -> usize {
        self.entries.values().filter(|e| e.is_waiting()).count()
    }

    /// Number of parties currently holding lanes
    pub fn num_holding_lanes(&self) -> usize {
        self.entries.values().filter(|e| e.holds_lanes()).count()
    }

    /// The waiting queue as the estimator sees it, sorted by order key.
    ///
    /// Entries still missing a key (possible only before the first
    /// `assign_order_keys` pass) are not part of the queue yet.
    pub fn waiting_parties(&self) -> Vec<QueuedParty> {
        let mut waiting: Vec<QueuedParty> = self
            .entries
            .values()
            .filter(|e| e.is_waiting())
            .filter_map(|e| {
                e.order_key().map(|key| QueuedParty {
                    id: e.id().to_string(),
                    lanes_needed: e.lanes_needed(),
                    order_key: key,
                })
            })
            .collect();
        waiting.sort_by(|a, b| a.order_key.total_cmp(&b.order_key));
        waiting
    }

    /// Parties currently holding lanes, as the estimator sees them.
    ///
    /// Called parties release at the end of their hold window, playing
    /// parties at the end of their play duration.
    pub fn active_occupants(&self, settings: &WaitlistSettings) -> Vec<ActiveOccupant> {
        self.entries
            .values()
            .filter(|e| e.holds_lanes())
            .map(|e| ActiveOccupant {
                lanes_held: e.lanes_needed(),
                release_at: e.lanes_released_at(settings),
            })
            .collect()
    }

    /// Largest order key currently in use by waiting entries
    pub fn max_waiting_order_key(&self) -> Option<f64> {
        self.entries
            .values()
            .filter(|e| e.is_waiting())
            .filter_map(|e| e.order_key())
            .fold(None, |acc, key| match acc {
                Some(max) if max >= key => Some(max),
                _ => Some(key),
            })
    }
}
