//! Time handling for the waitlist engine
//!
//! The engine never reads the wall clock. Every operation takes an explicit
//! `now` timestamp, so an estimation run is a pure function of its inputs and
//! can be replayed exactly in tests.
//!
//! CRITICAL: All timestamps are i64 milliseconds; all configured durations are
//! whole minutes. Rounding to display minutes happens at exactly one place
//! (`ceil_minutes_between`), never inside simulation arithmetic, so rounding
//! error cannot compound across chained projections.

/// Timestamp in milliseconds since the Unix epoch.
pub type Millis = i64;

/// Milliseconds in one minute.
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Convert a whole-minute duration to milliseconds.
///
/// # Example
/// ```
/// use waitlist_core_rs::core::time::minutes_to_millis;
///
/// assert_eq!(minutes_to_millis(30), 1_800_000);
/// ```
pub fn minutes_to_millis(minutes: i64) -> i64 {
    minutes * MILLIS_PER_MINUTE
}

/// Whole minutes from `from` to `to`, rounded up and clamped to zero.
///
/// A wait of 1ms reads as 1 minute; a wait that already passed reads as 0.
///
/// # Example
/// ```
/// use waitlist_core_rs::core::time::ceil_minutes_between;
///
/// assert_eq!(ceil_minutes_between(0, 0), 0);
/// assert_eq!(ceil_minutes_between(0, 60_000), 1);
/// assert_eq!(ceil_minutes_between(0, 60_001), 2);
/// assert_eq!(ceil_minutes_between(60_000, 0), 0);
/// ```
pub fn ceil_minutes_between(from: Millis, to: Millis) -> i64 {
    let delta = to - from;
    if delta <= 0 {
        return 0;
    }
    (delta + MILLIS_PER_MINUTE - 1) / MILLIS_PER_MINUTE
}
