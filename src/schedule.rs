//! Poll scheduling: when to poll, and what one poll does.
//!
//! A [`Ticker`] waits for the next aligned minute on a [`Clock`]; a
//! [`Poller`] runs one fetch → reconcile → persist cycle per tick. Any
//! error ends the loop. Restarting is left to whatever supervises the
//! process.

use std::{convert::Infallible, path::PathBuf, thread, time::Duration};

use jiff::{Timestamp, tz::TimeZone};
use tracing::{info, trace};

use crate::{
    fetch::{Fetch, FetchError},
    model::{ReportKind, StationId},
    reconcile::{Reconciliation, reconcile},
    storage::{Archive, Storage, StorageError},
};

/// How long to sleep between clock checks while waiting for a poll minute.
pub const DEFAULT_IDLE: Duration = Duration::from_secs(2);

/// How long to sleep after a cycle, so the same minute can't fire twice.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Errors that end the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("failed to fetch reports")]
    Fetch(#[from] FetchError),

    #[error("baseline missing at {}", .0.display())]
    MissingBaseline(PathBuf),

    #[error("baseline at {} is corrupt; fix or remove it before restarting", path.display())]
    CorruptBaseline {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to persist reports")]
    Io(#[source] StorageError),
}

impl From<StorageError> for CycleError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => Self::MissingBaseline(path),
            StorageError::Corrupt { path, source } => Self::CorruptBaseline { path, source },
            other => Self::Io(other),
        }
    }
}

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing changed; nothing was written.
    Unchanged,

    /// Some stations changed and were persisted.
    Updated {
        /// Number of stations in the delta.
        stations: usize,

        /// The archive entry written for this cycle.
        archived: PathBuf,
    },
}

// ── Time ──

/// Source of wall-clock time.
pub trait Clock {
    fn now(&self) -> Timestamp;
    fn sleep(&self, duration: Duration);
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Fires once per aligned minute past the hour (UTC).
#[derive(Debug)]
pub struct Ticker<C> {
    clock: C,
    minutes: Vec<u8>,
    idle: Duration,
    cooldown: Duration,
    last_fired: Option<i64>,
}

impl<C: Clock> Ticker<C> {
    pub fn new(clock: C, minutes: impl Into<Vec<u8>>) -> Self {
        Self {
            clock,
            minutes: minutes.into(),
            idle: DEFAULT_IDLE,
            cooldown: DEFAULT_COOLDOWN,
            last_fired: None,
        }
    }

    #[must_use]
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Whether `at` falls in one of the aligned minutes.
    pub fn is_aligned(&self, at: Timestamp) -> bool {
        let minute = at.to_zoned(TimeZone::UTC).minute();
        self.minutes.iter().any(|&m| i16::from(m) == i16::from(minute))
    }

    /// Blocks until an aligned minute that hasn't fired yet, and returns its time.
    pub fn next_tick(&mut self) -> Timestamp {
        loop {
            let now = self.clock.now();
            let minute = now.as_second().div_euclid(60);
            if self.is_aligned(now) && self.last_fired != Some(minute) {
                self.last_fired = Some(minute);
                return now;
            }
            trace!(%now, "not a poll minute, waiting");
            self.clock.sleep(self.idle);
        }
    }

    /// The coarse sleep after a completed cycle.
    pub fn cool_down(&self) {
        self.clock.sleep(self.cooldown);
    }
}

// ── Polling ──

/// Runs poll cycles for one report kind.
pub struct Poller<F, C> {
    kind: ReportKind,
    stations: Vec<StationId>,
    storage: Storage,
    archive: Archive,
    fetcher: F,
    ticker: Ticker<C>,
}

impl<F: Fetch, C: Clock> Poller<F, C> {
    pub fn new(
        kind: ReportKind,
        stations: Vec<StationId>,
        storage: Storage,
        archive: Archive,
        fetcher: F,
        ticker: Ticker<C>,
    ) -> Self {
        Self {
            kind,
            stations,
            storage,
            archive,
            fetcher,
            ticker,
        }
    }

    /// Polls forever. Returns only with the error that stopped it.
    pub fn run(&mut self) -> Result<Infallible, CycleError> {
        loop {
            let now = self.ticker.next_tick();
            self.poll_once(now)?;
            self.ticker.cool_down();
        }
    }

    /// One full cycle: bootstrap, fetch, reconcile, and persist any changes.
    ///
    /// `now` names the archive entry.
    pub fn poll_once(&self, now: Timestamp) -> Result<CycleOutcome, CycleError> {
        let kind = self.kind;
        info!(%kind, "polling");

        if self.storage.bootstrap(kind, self.stations.iter().cloned())? {
            info!(
                path = %self.storage.baseline_path(kind).display(),
                stations = self.stations.len(),
                "created blank baseline"
            );
        }

        let fetched = self.fetcher.fetch(kind)?;
        let baseline = self.storage.load(kind)?;
        let Reconciliation { delta, merged } = reconcile(&fetched, &baseline);

        if delta.is_empty() {
            info!(%kind, "not updated");
            return Ok(CycleOutcome::Unchanged);
        }

        self.storage.save_updates(kind, &delta)?;
        info!(stations = delta.len(), "saved latest updates");

        self.storage.save(kind, &merged)?;
        info!("updated baseline");

        let archived = self.archive.archive(&delta, now)?;
        info!(path = %archived.display(), "archived");

        Ok(CycleOutcome::Updated {
            stations: delta.len(),
            archived,
        })
    }
}
