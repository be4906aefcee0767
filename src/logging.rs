//! Log setup: one stream to the console and one file per report kind.
//!
//! Filtering follows `RUST_LOG`, defaulting to `info`. The file layer never
//! emits ANSI colors so `<log-dir>/<kind>.log` stays greppable.

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

use crate::model::ReportKind;

/// Errors that can occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file {}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("a global subscriber is already installed")]
    Init(#[from] TryInitError),
}

/// Path of the log file for a kind: `<log_dir>/<kind>.log`.
pub fn log_path(log_dir: &Path, kind: ReportKind) -> PathBuf {
    log_dir.join(format!("{kind}.log"))
}

/// Opens the kind's log file for appending, creating the directory if needed.
pub fn open_log_file(log_dir: &Path, kind: ReportKind) -> Result<(PathBuf, File), LoggingError> {
    let path = log_path(log_dir, kind);
    let open = || {
        fs::create_dir_all(log_dir)?;
        OpenOptions::new().create(true).append(true).open(&path)
    };
    match open() {
        Ok(file) => Ok((path, file)),
        Err(source) => Err(LoggingError::Open { path, source }),
    }
}

/// Installs the global subscriber and returns the log file path.
pub fn init(log_dir: &Path, kind: ReportKind) -> Result<PathBuf, LoggingError> {
    let (path, file) = open_log_file(log_dir, kind)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()?;

    Ok(path)
}
