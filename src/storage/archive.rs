//! Archive storage: one write-once file per cycle that saw changes.
//!
//! Entries are partitioned by UTC day and named by UTC minute:
//! `<root>/20240301/202403010005.json`.

use std::{fs, path::PathBuf};

use jiff::{Timestamp, tz::TimeZone};

use crate::model::Snapshot;

use super::{Result, io_error, write_snapshot};

/// Day-partitioned archive of deltas.
#[derive(Debug)]
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Creates an archive rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(io_error(&root))?;
        Ok(Self { root })
    }

    /// Path an entry for the given time would be written to.
    pub fn entry_path(&self, at: Timestamp) -> PathBuf {
        let utc = at.to_zoned(TimeZone::UTC);
        self.root
            .join(utc.strftime("%Y%m%d").to_string())
            .join(format!("{}.json", utc.strftime("%Y%m%d%H%M")))
    }

    /// Writes a delta under its day partition and returns the entry path.
    ///
    /// The partition directory is created on first use. An existing entry
    /// for the same minute is replaced; the poller fires at most once per
    /// minute, so that never happens in practice.
    pub fn archive(&self, delta: &Snapshot, at: Timestamp) -> Result<PathBuf> {
        let path = self.entry_path(at);
        if let Some(partition) = path.parent() {
            fs::create_dir_all(partition).map_err(io_error(partition))?;
        }
        write_snapshot(&path, delta)?;
        Ok(path)
    }
}
