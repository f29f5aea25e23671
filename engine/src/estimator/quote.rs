//! Hypothetical "party of N" quotes
//!
//! Answers the front-desk question "how long for a party of four, right
//! now?" without touching the real queue: a synthetic party is appended
//! behind every real one, the full simulation runs, and only the synthetic
//! party's estimate is read back. Because the probe resolves last it cannot
//! consume capacity an earlier party needed, so real estimates are provably
//! unaffected — and nothing is ever persisted.

use super::{estimate, ActiveOccupant, Estimate, QueuedParty};
use crate::core::time::Millis;

/// Id carried by the synthetic probe party inside the simulation.
const PROBE_ID: &str = "__quote__";

/// Estimate for a hypothetical party joining at the back of the line now.
///
/// # Example
/// ```
/// use waitlist_core_rs::estimator::quote::quote;
/// use waitlist_core_rs::estimator::ActiveOccupant;
///
/// let now = 1_700_000_000_000;
/// let occupants = vec![ActiveOccupant {
///     lanes_held: 8,
///     release_at: Some(now + 12 * 60_000),
/// }];
///
/// let q = quote(8, 30, &occupants, &[], 2, now);
/// assert_eq!(q.projected_wait_minutes, Some(12));
/// ```
pub fn quote(
    lanes_total: u32,
    service_minutes: i64,
    occupants: &[ActiveOccupant],
    waiting: &[QueuedParty],
    lanes_needed: u32,
    now: Millis,
) -> Estimate {
    // Strictly behind every real key, so the probe cannot jump the line.
    let max_key = waiting
        .iter()
        .map(|p| p.order_key)
        .fold(f64::NEG_INFINITY, f64::max);
    let probe_key = if max_key.is_finite() { max_key + 1.0 } else { 0.0 };

    let mut probed: Vec<QueuedParty> = waiting.to_vec();
    probed.push(QueuedParty {
        id: PROBE_ID.to_string(),
        lanes_needed,
        order_key: probe_key,
    });

    let mut estimates = estimate(lanes_total, service_minutes, occupants, &probed, now);
    estimates
        .remove(PROBE_ID)
        .expect("every queued party receives an estimate")
}
