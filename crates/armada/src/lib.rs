//! armada — two maritime registries built on arena-backed AVL trees.
//!
//! - [`ocean`]: ships with a dynamic crew, O(log n) membership changes,
//!   O(1) battle outcomes through a lazy per-ship treasure offset, cached
//!   richest pirate and FIFO transfer of the longest-serving pirate.
//! - [`fleets`]: weighted union-find over fleets where merges shift pirate
//!   ranks lazily and path compression folds the accumulated shifts.
//! - [`cli`]: the line-oriented command driver used by the `armada` binary.
//!
//! Both registries are single-threaded and every call is all-or-nothing: a
//! rejected call, including one that runs out of memory, leaves no trace.

pub mod cli;
pub mod error;
pub mod fleets;
pub mod ocean;

pub use error::{Error, Result, Status};
pub use fleets::{FleetId, Fleets};
pub use ocean::{Ocean, PirateId, ShipId, Treasure};
