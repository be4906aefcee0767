//! CLI interface for wxarchive.
//!
//! One positional argument picks the report kind; the process then polls
//! until something fails. Run one process per kind, and never two processes
//! against the same directories.

use std::{convert::Infallible, error::Error, fmt::Write, path::PathBuf};

use clap::{Parser, ValueEnum};
use tracing::info;

use crate::{
    config::{Config, ConfigError},
    fetch::CommandFetcher,
    logging::{self, LoggingError},
    model::ReportKind,
    schedule::{CycleError, Poller, SystemClock, Ticker},
    storage::{Archive, Storage, StorageError},
};

/// wxarchive — poll weather bulletins and archive what changed.
#[derive(Debug, Parser)]
#[command(name = "wxarchive", version)]
pub struct Cli {
    /// Report kind to poll for.
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Config file to read instead of `~/.wxarchive/config.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// CLI-facing report kind, mapped to the domain `ReportKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Routine aerodrome observations.
    Metar,
    /// Terminal aerodrome forecasts.
    Taf,
}

impl KindArg {
    pub fn to_domain(self) -> ReportKind {
        match self {
            Self::Metar => ReportKind::Metar,
            Self::Taf => ReportKind::Taf,
        }
    }
}

/// Anything that stops the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("failed to set up logging")]
    Logging(#[from] LoggingError),

    #[error("failed to open storage")]
    Storage(#[from] StorageError),

    #[error("poll cycle failed")]
    Cycle(#[from] CycleError),
}

/// Wire everything up from parsed arguments and poll until the first error.
pub fn run(cli: &Cli) -> Result<Infallible, AppError> {
    let kind = cli.kind.to_domain();
    let config = Config::load(cli.config.as_deref())?;
    let settings = config.for_kind(kind)?;

    let log_path = logging::init(&settings.log_dir, kind)?;
    info!(%kind, log = %log_path.display(), "starting");

    let fetcher = CommandFetcher::from_command_line(&settings.fetch_command).ok_or_else(|| {
        ConfigError::Invalid {
            kind,
            message: "fetch-command is empty".to_string(),
        }
    })?;
    let storage = Storage::new(&settings.realtime_dir)?;
    let archive = Archive::new(&settings.archive_dir)?;
    let ticker = Ticker::new(SystemClock, settings.poll_minutes.clone());

    let mut poller = Poller::new(
        kind,
        settings.stations.clone(),
        storage,
        archive,
        fetcher,
        ticker,
    );
    poller.run().map_err(AppError::from)
}

/// The error and every cause beneath it, one per line.
pub fn error_chain(err: &dyn Error) -> String {
    let mut trace = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(trace, "\n  caused by: {cause}");
        source = cause.source();
    }
    trace
}
