//! Local persistence for report snapshots.
//!
//! Each report kind keeps two snapshots in its realtime directory, and a
//! day-partitioned archive of every delta:
//!
//! ```text
//! <realtime>/
//!   all_<kind>s.json       # Baseline: last known report per station
//!   updated_<kind>s.json   # Most recent delta
//! <archive>/<YYYYMMDD>/
//!   <YYYYMMDDHHMM>.json    # One delta per cycle that saw changes
//! ```
//!
//! Snapshots are replaced whole: written to a temp file in the same
//! directory and renamed over the old one, so readers never see a torn file.

mod archive;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::model::{ReportKind, Snapshot, StationId};

pub use archive::Archive;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("corrupt snapshot at {}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error at {}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to encode snapshot")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// File-based store for the baseline and latest-updates snapshots.
#[derive(Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(io_error(&root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the baseline snapshot for a kind.
    pub fn baseline_path(&self, kind: ReportKind) -> PathBuf {
        self.root.join(kind.baseline_file_name())
    }

    /// Path of the latest-updates snapshot for a kind.
    pub fn updates_path(&self, kind: ReportKind) -> PathBuf {
        self.root.join(kind.updates_file_name())
    }

    // ── Baseline ──

    /// Loads the baseline snapshot.
    ///
    /// Fails with [`StorageError::NotFound`] if it was never bootstrapped.
    pub fn load(&self, kind: ReportKind) -> Result<Snapshot> {
        read_snapshot(&self.baseline_path(kind))
    }

    /// Creates a blank baseline for the given stations unless one already exists.
    ///
    /// Returns `true` if a baseline was created. Safe to call on every start.
    pub fn bootstrap<I>(&self, kind: ReportKind, stations: I) -> Result<bool>
    where
        I: IntoIterator<Item = StationId>,
    {
        let path = self.baseline_path(kind);
        if path.exists() {
            return Ok(false);
        }
        write_snapshot(&path, &Snapshot::blank(stations))?;
        Ok(true)
    }

    /// Replaces the baseline snapshot in full.
    pub fn save(&self, kind: ReportKind, snapshot: &Snapshot) -> Result<()> {
        write_snapshot(&self.baseline_path(kind), snapshot)
    }

    // ── Latest updates ──

    /// Replaces the latest-updates snapshot with the given delta.
    pub fn save_updates(&self, kind: ReportKind, delta: &Snapshot) -> Result<()> {
        write_snapshot(&self.updates_path(kind), delta)
    }

    /// Loads the latest-updates snapshot.
    pub fn load_updates(&self, kind: ReportKind) -> Result<Snapshot> {
        read_snapshot(&self.updates_path(kind))
    }
}

/// Reads and decodes a snapshot file.
fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(io_error(path)(e)),
    };
    serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a snapshot through a temp file in the target's directory, then renames it into place.
fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    serde_json::to_writer(&mut file, snapshot)?;
    file.as_file().sync_all().map_err(io_error(path))?;
    file.persist(path).map_err(|e| io_error(path)(e.error))?;
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("realtime")).unwrap();
        (dir, storage)
    }

    fn stations() -> Vec<StationId> {
        vec!["ZBAA".into(), "ZSSS".into()]
    }

    #[test]
    fn new_creates_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("a").join("b");
        Storage::new(&root).unwrap();

        assert!(root.is_dir());
    }

    #[test]
    fn load_missing_baseline_fails() {
        let (_dir, storage) = test_storage();
        let err = storage.load(ReportKind::Metar).unwrap_err();

        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn bootstrap_creates_blank_baseline() {
        let (_dir, storage) = test_storage();

        assert!(storage.bootstrap(ReportKind::Metar, stations()).unwrap());
        assert!(storage.root().join("all_metars.json").is_file());

        let loaded = storage.load(ReportKind::Metar).unwrap();
        assert_eq!(loaded, Snapshot::blank(stations()));
    }

    #[test]
    fn bootstrap_twice_is_same_as_once() {
        let (_dir, storage) = test_storage();

        storage.bootstrap(ReportKind::Taf, stations()).unwrap();
        let once = storage.load(ReportKind::Taf).unwrap();

        assert!(!storage.bootstrap(ReportKind::Taf, stations()).unwrap());
        let twice = storage.load(ReportKind::Taf).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn bootstrap_does_not_overwrite_existing_baseline() {
        let (_dir, storage) = test_storage();
        let existing: Snapshot = [("ZBAA", "METAR ZBAA 010000Z")].into_iter().collect();
        storage.save(ReportKind::Metar, &existing).unwrap();

        assert!(!storage.bootstrap(ReportKind::Metar, stations()).unwrap());
        assert_eq!(storage.load(ReportKind::Metar).unwrap(), existing);
    }

    #[test]
    fn kinds_are_stored_separately() {
        let (_dir, storage) = test_storage();
        storage.bootstrap(ReportKind::Metar, stations()).unwrap();

        let err = storage.load(ReportKind::Taf).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn save_replaces_whole_snapshot() {
        let (_dir, storage) = test_storage();
        storage.bootstrap(ReportKind::Metar, stations()).unwrap();

        let replacement: Snapshot = [("ZGGG", "METAR ZGGG 010030Z")].into_iter().collect();
        storage.save(ReportKind::Metar, &replacement).unwrap();

        assert_eq!(storage.load(ReportKind::Metar).unwrap(), replacement);
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let (_dir, storage) = test_storage();
        storage.bootstrap(ReportKind::Metar, stations()).unwrap();
        storage
            .save(ReportKind::Metar, &Snapshot::blank(stations()))
            .unwrap();
        storage
            .save_updates(ReportKind::Metar, &Snapshot::new())
            .unwrap();

        let mut names: Vec<String> = fs::read_dir(storage.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, ["all_metars.json", "updated_metars.json"]);
    }

    #[test]
    fn load_corrupt_baseline_fails() {
        let (_dir, storage) = test_storage();
        fs::write(storage.baseline_path(ReportKind::Metar), "{not json").unwrap();

        let err = storage.load(ReportKind::Metar).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn load_non_string_values_is_corrupt() {
        let (_dir, storage) = test_storage();
        fs::write(
            storage.baseline_path(ReportKind::Metar),
            r#"{"ZBAA": ["METAR"]}"#,
        )
        .unwrap();

        let err = storage.load(ReportKind::Metar).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn save_and_load_updates() {
        let (_dir, storage) = test_storage();
        let delta: Snapshot = [("ZSSS", "TAF ZSSS 010000Z")].into_iter().collect();

        storage.save_updates(ReportKind::Taf, &delta).unwrap();

        assert_eq!(storage.load_updates(ReportKind::Taf).unwrap(), delta);
        assert!(storage.root().join("updated_tafs.json").is_file());
    }

    #[test]
    fn snapshot_file_is_plain_json_object() {
        let (_dir, storage) = test_storage();
        storage.bootstrap(ReportKind::Metar, stations()).unwrap();

        let raw = fs::read_to_string(storage.baseline_path(ReportKind::Metar)).unwrap();
        assert_eq!(raw, r#"{"ZBAA":"","ZSSS":""}"#);
    }
}
