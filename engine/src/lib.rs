//! Waitlist Core - Wait-Time Estimation Engine
//!
//! Live waitlist for a capacity-limited venue: a fixed pool of
//! interchangeable lanes, parties holding lanes until a known release time,
//! and a strictly FIFO queue of waiting parties. The engine projects, for
//! every waiting party, when it will start, when it will finish, and how
//! long it waits — recomputed from scratch against the latest snapshot on
//! every poll.
//!
//! # Architecture
//!
//! - **core**: timestamp and minute arithmetic
//! - **models**: domain types (WaitlistEntry, WaitlistState, EventLog)
//! - **ordering**: stable order-key assignment for the waiting queue
//! - **estimator**: discrete-event capacity simulation + hypothetical quotes
//! - **board**: staff-facing aggregate tying it all together
//! - **persist**: record-store document boundary and snapshot fingerprints
//! - **rng**: deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All timestamps are i64 milliseconds; `now` is always an explicit
//!    parameter — the crate never reads the wall clock
//! 2. Order keys are assigned once and survive estimation, snapshots, and
//!    settings changes; only an explicit reorder rewrites one
//! 3. Estimation is pure: inputs are never mutated and identical snapshots
//!    produce identical projections

// Module declarations
pub mod board;
pub mod core;
pub mod estimator;
pub mod models;
pub mod ordering;
pub mod persist;
pub mod rng;

// Re-exports for convenience
pub use board::{BoardError, WaitlistBoard, WaitlistSettings};
pub use crate::core::time::Millis;
pub use estimator::{
    estimate, quote::quote, ActiveOccupant, Estimate, EstimateStatus, QueuedParty,
};
pub use models::{
    entry::{EntryStatus, WaitlistEntry},
    event::{Event, EventLog},
    state::WaitlistState,
};
pub use ordering::{assign_order_keys, key_before, key_between};
pub use persist::{fingerprint, BoardSnapshot, SnapshotError};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn waitlist_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::PyWaitlistBoard>()?;
    Ok(())
}
