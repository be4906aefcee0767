//! Core data model for wxarchive.
//!
//! Reports are opaque text keyed by station. A [`Snapshot`] is the unit
//! everything else reads, compares, and writes: the baseline, the delta,
//! and every archive entry are all snapshots.

mod kind;
mod snapshot;
mod station;

pub use kind::ReportKind;
pub use snapshot::Snapshot;
pub use station::{DEFAULT_STATIONS, StationId, default_stations};
