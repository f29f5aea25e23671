//! Wait-time estimation engine
//!
//! Projects a start time, end time, and wait for every waiting party by
//! running a discrete-event simulation over the lanes currently in use.
//!
//! # Algorithm
//!
//! ```text
//! 1. Every party still holding lanes becomes a future release event
//!    (a min-heap keyed by release time); lanes already free are available.
//! 2. Walk the waiting queue strictly in order-key order:
//!    - pull release events forward in time until enough lanes are free
//!      (events sharing a timestamp are applied together),
//!    - start the party at the simulated clock, and
//!    - push its own projected finish back into the heap so later,
//!      smaller parties can be placed behind it in the same run.
//! ```
//!
//! # Critical Invariants
//!
//! - **Strict FIFO**: lower order key starts first; no skipping, no
//!   look-ahead. A party that can never fit keeps its place in line but
//!   consumes no simulated capacity.
//! - **Pure**: no input is mutated, no state survives the call, identical
//!   inputs (including `now`) produce identical output. The caller re-runs
//!   the whole computation on every poll against its latest snapshot.
//! - **Total**: every input maps to a defined output; an impossible party
//!   yields a no-projection estimate, never an error.
//!
//! Cost is `O((occupants + waiting) log (occupants + waiting))` per run —
//! microseconds for realistic boards.

pub mod quote;

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::time::{ceil_minutes_between, minutes_to_millis, Millis};

/// A party currently holding lanes, as seen by the estimator.
///
/// An occupant with no release time, or one whose release is already in the
/// past, holds nothing for future accounting purposes: its lanes are free (or
/// about to be) and must not be double-counted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOccupant {
    /// Lanes this party occupies
    pub lanes_held: u32,

    /// When those lanes come free, if known
    pub release_at: Option<Millis>,
}

/// A waiting party, as seen by the estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedParty {
    /// Entry id the resulting estimate is keyed by
    pub id: String,

    /// Lanes the party needs, all at once
    pub lanes_needed: u32,

    /// Queue position; lower keys are served first
    pub order_key: f64,
}

/// Why an estimate does or does not carry a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    /// The party fits; projections are present
    Projected,

    /// The party needs more lanes than the venue has; no amount of waiting
    /// helps. Surfaced distinctly so staff see a flagged row, not a blank
    /// wait.
    ExceedsCapacity,

    /// Capacity was not reached before the release schedule ran out. With a
    /// well-formed snapshot every held lane has a scheduled release, so this
    /// is a defensive outcome rather than an expected one.
    Indeterminate,
}

/// Projection for one waiting party.
///
/// The three projection fields are `Some` exactly when `status` is
/// [`EstimateStatus::Projected`], and `None` together otherwise. Estimates
/// are advisory: they are recomputed from scratch on every poll and carry no
/// lifecycle of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Outcome of the projection
    pub status: EstimateStatus,

    /// When the party is projected to start
    pub projected_start_at: Option<Millis>,

    /// When the party is projected to finish
    pub projected_end_at: Option<Millis>,

    /// Whole minutes from `now` to the projected start, rounded up
    pub projected_wait_minutes: Option<i64>,
}

impl Estimate {
    fn projected(start_at: Millis, end_at: Millis, wait_minutes: i64) -> Self {
        Self {
            status: EstimateStatus::Projected,
            projected_start_at: Some(start_at),
            projected_end_at: Some(end_at),
            projected_wait_minutes: Some(wait_minutes),
        }
    }

    fn exceeds_capacity() -> Self {
        Self {
            status: EstimateStatus::ExceedsCapacity,
            projected_start_at: None,
            projected_end_at: None,
            projected_wait_minutes: None,
        }
    }

    fn indeterminate() -> Self {
        Self {
            status: EstimateStatus::Indeterminate,
            projected_start_at: None,
            projected_end_at: None,
            projected_wait_minutes: None,
        }
    }

    /// True when the estimate carries a projection
    pub fn is_projected(&self) -> bool {
        self.status == EstimateStatus::Projected
    }
}

/// A future point at which lanes come free.
///
/// Synthesized both from real occupants and from parties the simulation has
/// started during its own run. Ordered by time so `Reverse` turns the
/// standard max-heap into the min-heap the simulation pops from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ReleaseEvent {
    at: Millis,
    lanes_freed: u32,
}

/// Project start, end, and wait for every waiting party.
///
/// `service_minutes` is how long a party occupies its lanes once started —
/// a configured value, passed in so callers can model different stages
/// (e.g. a short call-up hold vs. the full play duration).
///
/// Inputs are read-only snapshots; `waiting` may arrive in any order and is
/// processed strictly by ascending `order_key`.
///
/// # Example
/// ```
/// use waitlist_core_rs::estimator::{estimate, ActiveOccupant, QueuedParty};
///
/// let now = 1_700_000_000_000;
/// let occupants = vec![ActiveOccupant {
///     lanes_held: 6,
///     release_at: Some(now + 5 * 60_000),
/// }];
/// let waiting = vec![
///     QueuedParty { id: "a".to_string(), lanes_needed: 4, order_key: 1.0 },
///     QueuedParty { id: "b".to_string(), lanes_needed: 6, order_key: 2.0 },
/// ];
///
/// let estimates = estimate(10, 30, &occupants, &waiting, now);
///
/// // Four lanes are free right away; six more open up in five minutes.
/// assert_eq!(estimates["a"].projected_wait_minutes, Some(0));
/// assert_eq!(estimates["b"].projected_wait_minutes, Some(5));
/// ```
pub fn estimate(
    lanes_total: u32,
    service_minutes: i64,
    occupants: &[ActiveOccupant],
    waiting: &[QueuedParty],
    now: Millis,
) -> HashMap<String, Estimate> {
    let mut releases: BinaryHeap<Reverse<ReleaseEvent>> =
        BinaryHeap::with_capacity(occupants.len() + waiting.len());

    // Lanes held with a release still ahead of us count as occupied and
    // contribute a release event. Everything else is already free.
    let mut occupied: i64 = 0;
    for occupant in occupants {
        match occupant.release_at {
            Some(at) if at > now => {
                occupied += i64::from(occupant.lanes_held);
                releases.push(Reverse(ReleaseEvent {
                    at,
                    lanes_freed: occupant.lanes_held,
                }));
            }
            _ => {}
        }
    }

    // Signed so an oversubscribed snapshot (settings shrank mid-session)
    // stays defined: the simulation simply waits through more releases.
    let mut available = i64::from(lanes_total) - occupied;

    let mut queue: Vec<&QueuedParty> = waiting.iter().collect();
    queue.sort_by(|a, b| a.order_key.total_cmp(&b.order_key));

    let mut t = now;
    let mut estimates = HashMap::with_capacity(queue.len());

    'queue: for party in queue {
        if party.lanes_needed > lanes_total {
            estimates.insert(party.id.clone(), Estimate::exceeds_capacity());
            continue;
        }

        while available < i64::from(party.lanes_needed) {
            match releases.pop() {
                Some(Reverse(release)) => {
                    t = release.at;
                    available += i64::from(release.lanes_freed);

                    // Releases sharing this timestamp free lanes together.
                    while let Some(&Reverse(peer)) = releases.peek() {
                        if peer.at != t {
                            break;
                        }
                        available += i64::from(peer.lanes_freed);
                        releases.pop();
                    }
                }
                None => {
                    // Schedule exhausted. Later parties may need fewer lanes
                    // than are already free, so keep walking the queue.
                    estimates.insert(party.id.clone(), Estimate::indeterminate());
                    continue 'queue;
                }
            }
        }

        let end_at = t + minutes_to_millis(service_minutes);
        estimates.insert(
            party.id.clone(),
            Estimate::projected(t, end_at, ceil_minutes_between(now, t)),
        );

        available -= i64::from(party.lanes_needed);
        releases.push(Reverse(ReleaseEvent {
            at: end_at,
            lanes_freed: party.lanes_needed,
        }));
    }

    estimates
}
