//! Waitlist entry model
//!
//! Represents one party on the board. Each entry has:
//! - A unique id (UUID) and the party's display name
//! - The number of lanes the party needs (fixed at join time)
//! - An order key defining its position in the waiting queue
//! - A status (Waiting, Called, Playing, Done, Canceled)
//!
//! The order key is assigned once and never rewritten as a side effect of
//! estimation; only the board's explicit reorder operation may replace it.
//! A party pulled back out of `Called` keeps its key, so it returns to the
//! exact queue position it held before being called.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::WaitlistSettings;
use crate::core::time::{minutes_to_millis, Millis};

/// Entry status
///
/// Tracks a party's lifecycle across the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Party is in the waiting queue
    Waiting,

    /// Party has been called up; lanes are reserved for the hold window
    Called {
        /// When staff called the party
        called_at: Millis,
    },

    /// Party is on its lanes
    Playing {
        /// When the party started
        started_at: Millis,
    },

    /// Party finished and its lanes are free
    Done {
        /// When the party finished
        finished_at: Millis,
    },

    /// Party left the list before starting
    Canceled {
        /// When the party was removed
        canceled_at: Millis,
    },
}

impl EntryStatus {
    /// Short status name, used in transition error messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Waiting => "waiting",
            EntryStatus::Called { .. } => "called",
            EntryStatus::Playing { .. } => "playing",
            EntryStatus::Done { .. } => "done",
            EntryStatus::Canceled { .. } => "canceled",
        }
    }
}

/// One party on the waitlist board
///
/// # Example
/// ```
/// use waitlist_core_rs::WaitlistEntry;
///
/// let entry = WaitlistEntry::new("Garcia".to_string(), 2, 1_700_000_000_000);
/// assert_eq!(entry.lanes_needed(), 2);
/// assert!(entry.is_waiting());
/// assert!(entry.order_key().is_none()); // assigned by the board, not here
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Unique entry identifier (UUID)
    id: String,

    /// Party display name
    name: String,

    /// Number of lanes this party occupies once started
    lanes_needed: u32,

    /// When the party joined the list
    joined_at: Millis,

    /// Queue position key; lower keys are served first.
    ///
    /// `None` only between creation and the first `assign_order_keys` pass.
    order_key: Option<f64>,

    /// Current status
    status: EntryStatus,
}

impl WaitlistEntry {
    /// Create a new waiting entry with a fresh UUID and no order key.
    pub fn new(name: String, lanes_needed: u32, joined_at: Millis) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            lanes_needed,
            joined_at,
            order_key: None,
            status: EntryStatus::Waiting,
        }
    }

    /// Entry id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Party name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lanes this party needs
    pub fn lanes_needed(&self) -> u32 {
        self.lanes_needed
    }

    /// When the party joined
    pub fn joined_at(&self) -> Millis {
        self.joined_at
    }

    /// Queue position key, if assigned
    pub fn order_key(&self) -> Option<f64> {
        self.order_key
    }

    /// Current status
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// True while the party is in the waiting queue
    pub fn is_waiting(&self) -> bool {
        matches!(self.status, EntryStatus::Waiting)
    }

    /// True while the party holds lanes (called or playing)
    pub fn holds_lanes(&self) -> bool {
        matches!(
            self.status,
            EntryStatus::Called { .. } | EntryStatus::Playing { .. }
        )
    }

    /// When this entry's lanes come free, if it currently holds any.
    ///
    /// A called party holds its lanes for the hold window; a playing party
    /// for the full play duration.
    pub fn lanes_released_at(&self, settings: &WaitlistSettings) -> Option<Millis> {
        match self.status {
            EntryStatus::Called { called_at } => {
                Some(called_at + minutes_to_millis(settings.hold_minutes))
            }
            EntryStatus::Playing { started_at } => {
                Some(started_at + minutes_to_millis(settings.play_minutes))
            }
            _ => None,
        }
    }

    pub(crate) fn set_order_key(&mut self, key: f64) {
        self.order_key = Some(key);
    }

    pub(crate) fn set_status(&mut self, status: EntryStatus) {
        self.status = status;
    }
}
