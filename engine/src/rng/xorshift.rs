//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used for the sub-unit order-key tiebreaker.
//! Two parties joining in the same millisecond still receive distinct,
//! strictly-ordered keys.
//!
//! # Determinism
//!
//! Same seed → same sequence. This is CRITICAL: a board restored from a
//! snapshot continues the exact tiebreak stream it would have produced had it
//! never been serialized, so replayed sessions assign identical keys.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use waitlist_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let a = rng.next_fraction();
/// let b = rng.next_fraction();
/// assert!(a >= 0.0 && a < 1.0);
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed.
    ///
    /// A zero seed is mapped to 1 (xorshift requires non-zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64 and advance the internal state.
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a fraction in `[0, 1)` with 53 bits of precision.
    ///
    /// Used as the sub-unit tiebreaker appended to millisecond-based order
    /// keys; the result is always strictly below 1, so the integer part of a
    /// key is never disturbed.
    pub fn next_fraction(&mut self) -> f64 {
        (self.next() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Current internal state, for checkpointing.
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RngManager::new(42);
        let mut b = RngManager::new(42);

        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = RngManager::new(1);
        let mut b = RngManager::new(2);

        assert_ne!(a.next(), b.next());
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = RngManager::new(0);
        let first = rng.next();
        assert_ne!(first, rng.next());
    }

    #[test]
    fn test_fraction_range() {
        let mut rng = RngManager::new(777);
        for _ in 0..1_000 {
            let f = rng.next_fraction();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_state_resumes_sequence() {
        let mut rng = RngManager::new(9);
        rng.next();
        let saved = rng.state();

        let mut resumed = RngManager::new(saved);
        assert_eq!(rng.next(), resumed.next());
    }
}
