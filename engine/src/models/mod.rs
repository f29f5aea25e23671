//! Domain models for the waitlist engine

pub mod entry;
pub mod event;
pub mod state;

// Re-exports
pub use entry::{EntryStatus, WaitlistEntry};
pub use event::{Event, EventLog};
pub use state::WaitlistState;
