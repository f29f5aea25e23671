//! Waitlist board - staff-facing aggregate
//!
//! Owns the live session: validated settings, the entry registry, the event
//! log, and the deterministic RNG feeding order-key tiebreakers. Every
//! operation takes an explicit `now` timestamp supplied by the host.
//!
//! Mutating operations (join, call, start, complete, cancel, requeue,
//! move_before) go through lifecycle checks and append an event. Reads
//! (`estimates`, `quote`) take `&self`, derive fresh snapshot views, and run
//! the estimator to completion — concurrent callers holding their own board
//! copies can never observe each other's intermediate state.
//!
//! Admission is not decided here: a party too large for the venue is
//! accepted onto the list and surfaces as an `ExceedsCapacity` estimate for
//! staff to resolve.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::time::Millis;
use crate::estimator::{self, quote::quote, Estimate};
use crate::models::entry::{EntryStatus, WaitlistEntry};
use crate::models::event::{Event, EventLog};
use crate::models::state::WaitlistState;
use crate::ordering::{assign_order_keys, key_before, key_between};
use crate::rng::RngManager;

/// Venue configuration for one board session
///
/// Supplied by the host's configuration source; immutable during a single
/// estimation run, replaceable between runs via [`WaitlistBoard::update_settings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistSettings {
    /// Total interchangeable lanes in the venue
    pub lanes_total: u32,

    /// Minutes a party occupies its lanes once started
    pub play_minutes: i64,

    /// Minutes lanes stay reserved for a called party that has not started
    pub hold_minutes: i64,
}

impl Default for WaitlistSettings {
    fn default() -> Self {
        Self {
            lanes_total: 8,
            play_minutes: 30,
            hold_minutes: 5,
        }
    }
}

impl WaitlistSettings {
    /// Check the settings are usable.
    ///
    /// Zero lanes is allowed (a venue can close lanes entirely); zero or
    /// negative durations are not.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.play_minutes < 1 {
            return Err(BoardError::InvalidSettings(format!(
                "play_minutes must be at least 1, got {}",
                self.play_minutes
            )));
        }
        if self.hold_minutes < 1 {
            return Err(BoardError::InvalidSettings(format!(
                "hold_minutes must be at least 1, got {}",
                self.hold_minutes
            )));
        }
        Ok(())
    }
}

/// Errors surfaced by board operations
#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("unknown entry {0}")]
    UnknownEntry(String),

    #[error("party size must be at least 1, got {0}")]
    InvalidPartySize(u32),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("entry {entry_id} cannot {action} while {status}")]
    InvalidTransition {
        entry_id: String,
        action: &'static str,
        status: &'static str,
    },
}

/// The live waitlist for one venue
///
/// # Example
/// ```
/// use waitlist_core_rs::{WaitlistBoard, WaitlistSettings};
///
/// let now = 1_700_000_000_000;
/// let mut board = WaitlistBoard::new(WaitlistSettings::default(), 42).unwrap();
///
/// let id = board.join("Garcia", 2, now).unwrap();
/// let estimates = board.estimates(now);
/// assert_eq!(estimates[&id].projected_wait_minutes, Some(0));
///
/// board.start(&id, now).unwrap();
/// assert_eq!(board.num_waiting(), 0);
/// ```
pub struct WaitlistBoard {
    /// Venue configuration
    settings: WaitlistSettings,

    /// Entry registry
    state: WaitlistState,

    /// Append-only operation log
    events: EventLog,

    /// Deterministic tiebreak source for order keys
    rng: RngManager,
}

impl WaitlistBoard {
    /// Create a board with validated settings and a seeded RNG.
    pub fn new(settings: WaitlistSettings, rng_seed: u64) -> Result<Self, BoardError> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: WaitlistState::new(),
            events: EventLog::new(),
            rng: RngManager::new(rng_seed),
        })
    }

    pub(crate) fn from_parts(
        settings: WaitlistSettings,
        state: WaitlistState,
        rng: RngManager,
    ) -> Self {
        Self {
            settings,
            state,
            events: EventLog::new(),
            rng,
        }
    }

    /// Current settings
    pub fn settings(&self) -> &WaitlistSettings {
        &self.settings
    }

    /// Replace the settings between estimation runs.
    pub fn update_settings(&mut self, settings: WaitlistSettings) -> Result<(), BoardError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Entry registry
    pub fn state(&self) -> &WaitlistState {
        &self.state
    }

    /// Operation log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub(crate) fn rng(&self) -> &RngManager {
        &self.rng
    }

    /// Parties currently waiting
    pub fn num_waiting(&self) -> usize {
        self.state.num_waiting()
    }

    /// Parties currently holding lanes
    pub fn num_holding_lanes(&self) -> usize {
        self.state.num_holding_lanes()
    }

    /// Add a party to the back of the line.
    ///
    /// Returns the new entry's id. The order key is assigned immediately,
    /// before the host persists the entry.
    pub fn join(&mut self, name: &str, lanes_needed: u32, now: Millis) -> Result<String, BoardError> {
        if lanes_needed == 0 {
            return Err(BoardError::InvalidPartySize(0));
        }

        let entry = WaitlistEntry::new(name.to_string(), lanes_needed, now);
        let id = entry.id().to_string();
        self.state.add_entry(entry);

        assign_order_keys(self.state.entries_mut().values_mut(), now, &mut self.rng);

        self.events.log(Event::Joined {
            at: now,
            entry_id: id.clone(),
            name: name.to_string(),
            lanes_needed,
        });
        Ok(id)
    }

    /// Call a waiting party up; its lanes are reserved for the hold window.
    pub fn call(&mut self, id: &str, now: Millis) -> Result<(), BoardError> {
        let entry = self.entry_mut(id)?;
        match entry.status() {
            EntryStatus::Waiting => {
                entry.set_status(EntryStatus::Called { called_at: now });
                self.events.log(Event::Called {
                    at: now,
                    entry_id: id.to_string(),
                });
                Ok(())
            }
            other => Err(BoardError::InvalidTransition {
                entry_id: id.to_string(),
                action: "call",
                status: other.label(),
            }),
        }
    }

    /// Put a party on its lanes, from the queue or from a call-up.
    pub fn start(&mut self, id: &str, now: Millis) -> Result<(), BoardError> {
        let entry = self.entry_mut(id)?;
        match entry.status() {
            EntryStatus::Waiting | EntryStatus::Called { .. } => {
                entry.set_status(EntryStatus::Playing { started_at: now });
                self.events.log(Event::Started {
                    at: now,
                    entry_id: id.to_string(),
                });
                Ok(())
            }
            other => Err(BoardError::InvalidTransition {
                entry_id: id.to_string(),
                action: "start",
                status: other.label(),
            }),
        }
    }

    /// Mark a playing party finished; its lanes come free.
    pub fn complete(&mut self, id: &str, now: Millis) -> Result<(), BoardError> {
        let entry = self.entry_mut(id)?;
        match entry.status() {
            EntryStatus::Playing { .. } => {
                entry.set_status(EntryStatus::Done { finished_at: now });
                self.events.log(Event::Completed {
                    at: now,
                    entry_id: id.to_string(),
                });
                Ok(())
            }
            other => Err(BoardError::InvalidTransition {
                entry_id: id.to_string(),
                action: "complete",
                status: other.label(),
            }),
        }
    }

    /// Remove a party that has not started.
    pub fn cancel(&mut self, id: &str, now: Millis) -> Result<(), BoardError> {
        let entry = self.entry_mut(id)?;
        match entry.status() {
            EntryStatus::Waiting | EntryStatus::Called { .. } => {
                entry.set_status(EntryStatus::Canceled { canceled_at: now });
                self.events.log(Event::Canceled {
                    at: now,
                    entry_id: id.to_string(),
                });
                Ok(())
            }
            other => Err(BoardError::InvalidTransition {
                entry_id: id.to_string(),
                action: "cancel",
                status: other.label(),
            }),
        }
    }

    /// Return a called party to the queue.
    ///
    /// The original order key is retained, so the party reappears at the
    /// exact position it held before being called.
    pub fn requeue(&mut self, id: &str, now: Millis) -> Result<(), BoardError> {
        let entry = self.entry_mut(id)?;
        match entry.status() {
            EntryStatus::Called { .. } => {
                entry.set_status(EntryStatus::Waiting);
                self.events.log(Event::Requeued {
                    at: now,
                    entry_id: id.to_string(),
                });
                Ok(())
            }
            other => Err(BoardError::InvalidTransition {
                entry_id: id.to_string(),
                action: "requeue",
                status: other.label(),
            }),
        }
    }

    /// Move a waiting party directly ahead of another waiting party.
    ///
    /// This is the one operation that rewrites an existing order key.
    pub fn move_before(&mut self, id: &str, other_id: &str, now: Millis) -> Result<(), BoardError> {
        if id == other_id {
            return Ok(());
        }

        let anchor_key = self.waiting_key(other_id, "reorder around")?;
        self.waiting_key(id, "reorder")?;

        // Nearest waiting key strictly below the anchor, ignoring the party
        // being moved.
        let predecessor = self
            .state
            .entries()
            .values()
            .filter(|e| e.is_waiting() && e.id() != id)
            .filter_map(|e| e.order_key())
            .filter(|&key| key < anchor_key)
            .fold(None, |acc: Option<f64>, key| match acc {
                Some(max) if max >= key => Some(max),
                _ => Some(key),
            });

        let new_key = match predecessor {
            Some(lower) => key_between(lower, anchor_key),
            None => key_before(anchor_key),
        };

        self.state
            .get_entry_mut(id)
            .ok_or_else(|| BoardError::UnknownEntry(id.to_string()))?
            .set_order_key(new_key);

        self.events.log(Event::Reordered {
            at: now,
            entry_id: id.to_string(),
            before_id: other_id.to_string(),
        });
        Ok(())
    }

    /// Project start, end, and wait for every waiting party.
    ///
    /// Recomputed from scratch against the current registry on every call;
    /// nothing is cached and nothing is mutated.
    pub fn estimates(&self, now: Millis) -> HashMap<String, Estimate> {
        let occupants = self.state.active_occupants(&self.settings);
        let waiting = self.state.waiting_parties();
        estimator::estimate(
            self.settings.lanes_total,
            self.settings.play_minutes,
            &occupants,
            &waiting,
            now,
        )
    }

    /// Estimate for a hypothetical party of `lanes_needed` joining now.
    ///
    /// Nothing is persisted and no real party's estimate is affected.
    pub fn quote(&self, lanes_needed: u32, now: Millis) -> Result<Estimate, BoardError> {
        if lanes_needed == 0 {
            return Err(BoardError::InvalidPartySize(0));
        }
        let occupants = self.state.active_occupants(&self.settings);
        let waiting = self.state.waiting_parties();
        Ok(quote(
            self.settings.lanes_total,
            self.settings.play_minutes,
            &occupants,
            &waiting,
            lanes_needed,
            now,
        ))
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut WaitlistEntry, BoardError> {
        self.state
            .get_entry_mut(id)
            .ok_or_else(|| BoardError::UnknownEntry(id.to_string()))
    }

    fn waiting_key(&self, id: &str, action: &'static str) -> Result<f64, BoardError> {
        let entry = self
            .state
            .get_entry(id)
            .ok_or_else(|| BoardError::UnknownEntry(id.to_string()))?;
        match entry.status() {
            EntryStatus::Waiting => entry.order_key().ok_or(BoardError::InvalidTransition {
                entry_id: id.to_string(),
                action,
                status: "waiting",
            }),
            other => Err(BoardError::InvalidTransition {
                entry_id: id.to_string(),
                action,
                status: other.label(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::MILLIS_PER_MINUTE;

    const NOW: Millis = 1_700_000_000_000;

    fn board() -> WaitlistBoard {
        WaitlistBoard::new(
            WaitlistSettings {
                lanes_total: 10,
                play_minutes: 30,
                hold_minutes: 5,
            },
            42,
        )
        .unwrap()
    }

    #[test]
    fn test_new_board_rejects_bad_settings() {
        let result = WaitlistBoard::new(
            WaitlistSettings {
                lanes_total: 8,
                play_minutes: 0,
                hold_minutes: 5,
            },
            42,
        );

        assert!(matches!(result, Err(BoardError::InvalidSettings(_))));
    }

    #[test]
    fn test_join_assigns_key_and_logs() {
        let mut board = board();

        let id = board.join("Garcia", 2, NOW).unwrap();

        let entry = board.state().get_entry(&id).unwrap();
        assert!(entry.order_key().is_some());
        assert_eq!(board.events().len(), 1);
        assert_eq!(board.num_waiting(), 1);
    }

    #[test]
    fn test_join_rejects_empty_party() {
        let mut board = board();

        assert_eq!(
            board.join("Nobody", 0, NOW),
            Err(BoardError::InvalidPartySize(0))
        );
        assert_eq!(board.num_waiting(), 0);
    }

    #[test]
    fn test_parties_join_in_fifo_order() {
        let mut board = board();

        let first = board.join("First", 2, NOW).unwrap();
        let second = board.join("Second", 2, NOW).unwrap();

        let key = |id: &str| board.state().get_entry(id).unwrap().order_key().unwrap();
        assert!(key(&first) < key(&second));
    }

    #[test]
    fn test_lifecycle_walk_through() {
        let mut board = board();
        let id = board.join("Garcia", 4, NOW).unwrap();

        board.call(&id, NOW + 1_000).unwrap();
        board.start(&id, NOW + 2_000).unwrap();
        board.complete(&id, NOW + 3_000).unwrap();

        let entry = board.state().get_entry(&id).unwrap();
        assert_eq!(
            entry.status(),
            EntryStatus::Done {
                finished_at: NOW + 3_000
            }
        );
        assert_eq!(board.events().events_for_entry(&id).len(), 4);
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        let mut board = board();
        let id = board.join("Garcia", 4, NOW).unwrap();

        // Cannot complete a party that never started.
        let err = board.complete(&id, NOW).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidTransition {
                entry_id: id.clone(),
                action: "complete",
                status: "waiting",
            }
        );

        board.start(&id, NOW).unwrap();

        // Cannot cancel a playing party.
        assert!(matches!(
            board.cancel(&id, NOW),
            Err(BoardError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_unknown_entry() {
        let mut board = board();

        assert_eq!(
            board.call("missing", NOW),
            Err(BoardError::UnknownEntry("missing".to_string()))
        );
    }

    #[test]
    fn test_requeue_restores_original_position() {
        let mut board = board();
        let first = board.join("First", 2, NOW).unwrap();
        let second = board.join("Second", 2, NOW).unwrap();

        let original_key = board.state().get_entry(&first).unwrap().order_key();

        board.call(&first, NOW + 1_000).unwrap();
        board.requeue(&first, NOW + 2_000).unwrap();

        let entry = board.state().get_entry(&first).unwrap();
        assert!(entry.is_waiting());
        assert_eq!(entry.order_key(), original_key);

        // Still ahead of the party that joined later.
        let queue = board.state().waiting_parties();
        assert_eq!(queue[0].id, first);
        assert_eq!(queue[1].id, second);
    }

    #[test]
    fn test_move_before_lands_between_neighbors() {
        let mut board = board();
        let a = board.join("A", 2, NOW).unwrap();
        let b = board.join("B", 2, NOW).unwrap();
        let c = board.join("C", 2, NOW).unwrap();

        board.move_before(&c, &b, NOW + 1_000).unwrap();

        let queue = board.state().waiting_parties();
        let ids: Vec<&str> = queue.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str(), b.as_str()]);
    }

    #[test]
    fn test_move_before_front_of_queue() {
        let mut board = board();
        let a = board.join("A", 2, NOW).unwrap();
        let b = board.join("B", 2, NOW).unwrap();

        board.move_before(&b, &a, NOW + 1_000).unwrap();

        let queue = board.state().waiting_parties();
        assert_eq!(queue[0].id, b);
        assert_eq!(queue[1].id, a);
    }

    #[test]
    fn test_move_before_requires_both_waiting() {
        let mut board = board();
        let a = board.join("A", 2, NOW).unwrap();
        let b = board.join("B", 2, NOW).unwrap();
        board.start(&a, NOW).unwrap();

        assert!(matches!(
            board.move_before(&b, &a, NOW),
            Err(BoardError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_estimates_track_called_and_playing_holds() {
        let mut board = board();

        // Six lanes playing for 30 minutes, two lanes held by a call-up for
        // the 5-minute hold window.
        let playing = board.join("Playing", 6, NOW).unwrap();
        board.start(&playing, NOW).unwrap();
        let called = board.join("Called", 2, NOW).unwrap();
        board.call(&called, NOW).unwrap();

        let waiting = board.join("Waiting", 4, NOW).unwrap();

        let estimates = board.estimates(NOW);

        // Only the waiting party is estimated.
        assert_eq!(estimates.len(), 1);
        // 2 lanes free now; 2 more at +5 (hold expiry) cover the need of 4.
        assert_eq!(estimates[&waiting].projected_wait_minutes, Some(5));
    }

    #[test]
    fn test_estimates_see_larger_venue_after_settings_update() {
        let mut board = board();
        let playing = board.join("Playing", 10, NOW).unwrap();
        board.start(&playing, NOW).unwrap();
        let waiting = board.join("Waiting", 4, NOW).unwrap();

        assert_eq!(board.estimates(NOW)[&waiting].projected_wait_minutes, Some(30));

        board
            .update_settings(WaitlistSettings {
                lanes_total: 14,
                play_minutes: 30,
                hold_minutes: 5,
            })
            .unwrap();

        assert_eq!(board.estimates(NOW)[&waiting].projected_wait_minutes, Some(0));
    }

    #[test]
    fn test_quote_does_not_mutate_board() {
        let mut board = board();
        board.join("Garcia", 4, NOW).unwrap();

        let before = board.estimates(NOW);
        let q = board.quote(2, NOW).unwrap();
        let after = board.estimates(NOW);

        assert!(q.is_projected());
        assert_eq!(before, after);
        assert_eq!(board.num_waiting(), 1);
        // No event is logged for a pure read.
        assert_eq!(board.events().len(), 1);
    }

    #[test]
    fn test_quote_rejects_empty_party() {
        let board = board();

        assert_eq!(
            board.quote(0, NOW),
            Err(BoardError::InvalidPartySize(0))
        );
    }

    #[test]
    fn test_completed_lanes_free_immediately() {
        let mut board = board();
        let playing = board.join("Playing", 10, NOW).unwrap();
        board.start(&playing, NOW).unwrap();
        let waiting = board.join("Waiting", 10, NOW).unwrap();

        assert_eq!(board.estimates(NOW)[&waiting].projected_wait_minutes, Some(30));

        board.complete(&playing, NOW + 10 * MILLIS_PER_MINUTE).unwrap();

        let estimates = board.estimates(NOW + 10 * MILLIS_PER_MINUTE);
        assert_eq!(estimates[&waiting].projected_wait_minutes, Some(0));
    }
}
