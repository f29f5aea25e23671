//! Python bindings (feature `pyo3`)
//!
//! Minimal boundary: scalars in, JSON strings out. See `board_py` for the
//! exposed class.

pub mod board_py;

pub use board_py::PyWaitlistBoard;
