//! Polls a source of aviation weather bulletins (METAR, TAF) and keeps what
//! changed.
//!
//! Each cycle compares freshly fetched reports against a baseline snapshot,
//! then writes the changed stations to a latest-updates file and to a
//! day-partitioned archive.

pub mod cli;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod schedule;
pub mod storage;
