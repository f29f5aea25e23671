//! PyO3 wrapper for the waitlist board
//!
//! The boundary is deliberately small: configuration comes in as a JSON
//! string, estimates and snapshots go out as JSON strings, and every other
//! argument is a scalar. The host deserializes on its side; no Python
//! object graphs cross into Rust.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::board::{WaitlistBoard, WaitlistSettings};
use crate::persist::{fingerprint, BoardSnapshot};

fn value_err(err: impl std::fmt::Display) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

fn runtime_err(err: impl std::fmt::Display) -> PyErr {
    PyErr::new::<PyRuntimeError, _>(err.to_string())
}

/// Python handle on a live waitlist board
///
/// # Example (from Python)
///
/// ```python
/// from waitlist_core import WaitlistBoard
///
/// board = WaitlistBoard.new(
///     '{"lanes_total": 8, "play_minutes": 30, "hold_minutes": 5}',
///     rng_seed=42,
/// )
/// entry_id = board.join("Garcia", 2, now_ms)
/// estimates = json.loads(board.estimates_json(now_ms))
/// ```
#[pyclass(name = "WaitlistBoard")]
pub struct PyWaitlistBoard {
    inner: WaitlistBoard,
}

#[pymethods]
impl PyWaitlistBoard {
    /// Create a board from a settings JSON document.
    #[staticmethod]
    fn new(settings_json: &str, rng_seed: u64) -> PyResult<Self> {
        let settings: WaitlistSettings =
            serde_json::from_str(settings_json).map_err(value_err)?;
        let inner = WaitlistBoard::new(settings, rng_seed).map_err(value_err)?;
        Ok(Self { inner })
    }

    /// Rebuild a board from a stored snapshot document.
    #[staticmethod]
    fn restore_json(snapshot_json: &str) -> PyResult<Self> {
        let snapshot: BoardSnapshot = serde_json::from_str(snapshot_json).map_err(value_err)?;
        let inner = WaitlistBoard::restore(snapshot).map_err(value_err)?;
        Ok(Self { inner })
    }

    /// Replace the venue settings.
    fn update_settings(&mut self, settings_json: &str) -> PyResult<()> {
        let settings: WaitlistSettings =
            serde_json::from_str(settings_json).map_err(value_err)?;
        self.inner.update_settings(settings).map_err(value_err)
    }

    /// Add a party; returns the new entry id.
    fn join(&mut self, name: &str, lanes_needed: u32, now: i64) -> PyResult<String> {
        self.inner.join(name, lanes_needed, now).map_err(value_err)
    }

    /// Call a waiting party up.
    fn call(&mut self, entry_id: &str, now: i64) -> PyResult<()> {
        self.inner.call(entry_id, now).map_err(value_err)
    }

    /// Put a party on its lanes.
    fn start(&mut self, entry_id: &str, now: i64) -> PyResult<()> {
        self.inner.start(entry_id, now).map_err(value_err)
    }

    /// Mark a playing party finished.
    fn complete(&mut self, entry_id: &str, now: i64) -> PyResult<()> {
        self.inner.complete(entry_id, now).map_err(value_err)
    }

    /// Remove a party that has not started.
    fn cancel(&mut self, entry_id: &str, now: i64) -> PyResult<()> {
        self.inner.cancel(entry_id, now).map_err(value_err)
    }

    /// Return a called party to its old queue position.
    fn requeue(&mut self, entry_id: &str, now: i64) -> PyResult<()> {
        self.inner.requeue(entry_id, now).map_err(value_err)
    }

    /// Move a waiting party directly ahead of another.
    fn move_before(&mut self, entry_id: &str, other_id: &str, now: i64) -> PyResult<()> {
        self.inner
            .move_before(entry_id, other_id, now)
            .map_err(value_err)
    }

    /// Estimates for every waiting party, as a JSON object keyed by id.
    fn estimates_json(&self, now: i64) -> PyResult<String> {
        serde_json::to_string(&self.inner.estimates(now)).map_err(runtime_err)
    }

    /// Estimate for a hypothetical party of `lanes_needed`, as JSON.
    fn quote_json(&self, lanes_needed: u32, now: i64) -> PyResult<String> {
        let estimate = self.inner.quote(lanes_needed, now).map_err(value_err)?;
        serde_json::to_string(&estimate).map_err(runtime_err)
    }

    /// The storable snapshot document, as JSON.
    fn snapshot_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.snapshot()).map_err(runtime_err)
    }

    /// SHA-256 fingerprint of the snapshot document.
    fn fingerprint(&self) -> PyResult<String> {
        fingerprint(&self.inner.snapshot()).map_err(runtime_err)
    }

    /// Number of parties currently waiting.
    fn num_waiting(&self) -> usize {
        self.inner.num_waiting()
    }

    /// Number of parties currently holding lanes.
    fn num_holding_lanes(&self) -> usize {
        self.inner.num_holding_lanes()
    }
}
