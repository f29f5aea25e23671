//! Queue ordering
//!
//! Guarantees every waiting entry a stable, totally-ordered position key.
//! Keys are assigned exactly once; estimation never rewrites them, so a
//! party's place in line survives any number of estimate refreshes,
//! snapshot round-trips, and settings changes.
//!
//! # Key construction
//!
//! A fresh key is `max(now in ms, current high water mark) + fraction`, with
//! the fraction drawn from the deterministic RNG. The millisecond base keeps
//! keys monotonic across calls; the sub-unit fraction separates parties
//! created within the same millisecond; the high-water-mark check keeps every
//! new key strictly above all keys already in use by waiting entries, so a
//! new party always lands at the back of the line.

use crate::core::time::Millis;
use crate::models::entry::WaitlistEntry;
use crate::rng::RngManager;

/// Assign order keys to every waiting entry that lacks one.
///
/// Entries are visited in the order the iterator yields them (arrival order,
/// for a host passing its fetched list). Existing keys are never touched.
/// Returns the number of keys assigned — `0` means the pass was a structural
/// no-op, which callers use to skip a persistence write.
///
/// # Example
/// ```
/// use waitlist_core_rs::{assign_order_keys, RngManager, WaitlistEntry};
///
/// let mut entries = vec![
///     WaitlistEntry::new("Garcia".to_string(), 2, 1_700_000_000_000),
///     WaitlistEntry::new("Okafor".to_string(), 4, 1_700_000_000_000),
/// ];
/// let mut rng = RngManager::new(42);
///
/// let assigned = assign_order_keys(entries.iter_mut(), 1_700_000_000_000, &mut rng);
/// assert_eq!(assigned, 2);
/// assert!(entries[0].order_key().unwrap() < entries[1].order_key().unwrap());
///
/// // Second pass: everything keyed, nothing to write back.
/// assert_eq!(assign_order_keys(entries.iter_mut(), 1_700_000_000_001, &mut rng), 0);
/// ```
pub fn assign_order_keys<'a, I>(entries: I, now: Millis, rng: &mut RngManager) -> usize
where
    I: IntoIterator<Item = &'a mut WaitlistEntry>,
{
    let entries: Vec<&mut WaitlistEntry> = entries.into_iter().collect();

    // High water mark over keys already in use by waiting entries.
    let mut high = entries
        .iter()
        .filter(|e| e.is_waiting())
        .filter_map(|e| e.order_key())
        .fold(f64::NEG_INFINITY, f64::max);

    let mut assigned = 0;
    for entry in entries {
        if !entry.is_waiting() || entry.order_key().is_some() {
            continue;
        }

        let mut key = now as f64 + rng.next_fraction();
        if key <= high {
            key = high + 1.0 + rng.next_fraction();
        }

        entry.set_order_key(key);
        high = key;
        assigned += 1;
    }
    assigned
}

/// Key placing an entry strictly between two neighbors.
///
/// Midpoint of the open interval. Callers must pass `lower < upper`.
pub fn key_between(lower: f64, upper: f64) -> f64 {
    debug_assert!(lower < upper, "key_between requires lower < upper");
    lower + (upper - lower) / 2.0
}

/// Key placing an entry ahead of the current front of the queue.
pub fn key_before(first: f64) -> f64 {
    first - 1.0
}
