//! Snapshot boundary for the host's record store
//!
//! The engine never talks to a database. This module defines the document
//! shape the host reads and writes, converts a live board to and from it,
//! and fingerprints it so pollers can cheaply detect "nothing changed".
//!
//! # Critical Invariants
//!
//! - **Determinism**: entries serialize in a canonical order (joined_at,
//!   then id), so two structurally-identical boards produce byte-identical
//!   documents and equal fingerprints
//! - **Entry Uniqueness**: restore rejects duplicate ids with an error
//!   instead of silently dropping records
//! - **RNG Continuity**: the tiebreak stream survives a round-trip, so a
//!   restored board keys new parties exactly as the original would have

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

use crate::board::{BoardError, WaitlistBoard, WaitlistSettings};
use crate::models::entry::WaitlistEntry;
use crate::models::state::WaitlistState;
use crate::rng::RngManager;

/// Errors raised while loading a stored board
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("duplicate entry id {0}")]
    DuplicateEntry(String),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Everything the record store holds for one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Venue configuration
    pub settings: WaitlistSettings,

    /// Every entry, in canonical order
    pub entries: Vec<WaitlistEntry>,

    /// RNG state, so key tiebreaking resumes where it left off
    pub rng_state: u64,
}

impl WaitlistBoard {
    /// Capture the board as a storable document.
    ///
    /// The event log is transient operational history and is not part of the
    /// document.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut entries: Vec<WaitlistEntry> = self.state().entries().values().cloned().collect();
        entries.sort_by(|a, b| {
            a.joined_at()
                .cmp(&b.joined_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        BoardSnapshot {
            settings: self.settings().clone(),
            entries,
            rng_state: self.rng().state(),
        }
    }

    /// Rebuild a board from a stored document.
    pub fn restore(snapshot: BoardSnapshot) -> Result<WaitlistBoard, SnapshotError> {
        snapshot.settings.validate()?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(snapshot.entries.len());
        for entry in &snapshot.entries {
            if !seen.insert(entry.id()) {
                return Err(SnapshotError::DuplicateEntry(entry.id().to_string()));
            }
        }

        let mut state = WaitlistState::new();
        for entry in snapshot.entries {
            state.add_entry(entry);
        }

        Ok(WaitlistBoard::from_parts(
            snapshot.settings,
            state,
            RngManager::new(snapshot.rng_state),
        ))
    }
}

/// SHA-256 hex fingerprint of the canonical JSON encoding.
///
/// Equal boards fingerprint equal; any entry, key, status, or settings
/// change produces a new fingerprint. Hosts compare fingerprints to skip
/// redundant writes and display pushes.
///
/// # Example
/// ```
/// use waitlist_core_rs::{fingerprint, WaitlistBoard, WaitlistSettings};
///
/// let board = WaitlistBoard::new(WaitlistSettings::default(), 42).unwrap();
/// let print = fingerprint(&board.snapshot()).unwrap();
/// assert_eq!(print.len(), 64);
/// ```
pub fn fingerprint(snapshot: &BoardSnapshot) -> Result<String, SnapshotError> {
    let bytes = serde_json::to_vec(snapshot)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();

    Ok(format!("{:x}", digest))
}
