//! wxarchive configuration.
//!
//! Loaded once at startup from `~/.wxarchive/config.toml` (or `--config`).
//! Each report kind has its own table:
//!
//! ```toml
//! [metar]
//! log-dir = "/var/log/wxarchive"
//! archive-dir = "/data/metar/archive"
//! realtime-dir = "/data/metar/realtime"
//! fetch-command = ["python3", "collect.py", "{kind}"]
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::model::{ReportKind, StationId, default_stations};

/// Minutes past the hour at which a poll fires.
///
/// `:10` is absent; this is the long-standing production cadence.
pub const DEFAULT_POLL_MINUTES: &[u8] = &[0, 5, 15, 20, 25, 30, 35, 40, 45, 50, 55];

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("no config file found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no [{0}] section in config")]
    MissingKind(ReportKind),

    #[error("[{kind}] {message}")]
    Invalid { kind: ReportKind, message: String },
}

pub type Result<T> = core::result::Result<T, ConfigError>;

/// Top-level configuration: one optional table per report kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub metar: Option<KindConfig>,
    pub taf: Option<KindConfig>,
}

/// Settings for polling one report kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KindConfig {
    /// Directory the `<kind>.log` file is written to.
    pub log_dir: PathBuf,

    /// Root of the day-partitioned archive.
    pub archive_dir: PathBuf,

    /// Directory holding the baseline and latest-updates snapshots.
    pub realtime_dir: PathBuf,

    /// Program and arguments printing a JSON object of station → report.
    /// `{kind}` in any argument is replaced by the kind name.
    pub fetch_command: Vec<String>,

    /// Minutes past the hour to poll at.
    #[serde(default = "default_poll_minutes")]
    pub poll_minutes: Vec<u8>,

    /// Stations a fresh baseline is seeded with.
    #[serde(default = "default_stations")]
    pub stations: Vec<StationId>,
}

fn default_poll_minutes() -> Vec<u8> {
    DEFAULT_POLL_MINUTES.to_vec()
}

impl Config {
    /// Load config from the given path, or `~/.wxarchive/config.toml`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path().ok_or(ConfigError::NoHome)?,
        };

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path));
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        Self::parse(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Parse config from TOML text.
    pub fn parse(contents: &str) -> core::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// The config file path: `~/.wxarchive/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".wxarchive").join("config.toml"))
    }

    /// The validated settings for one kind.
    pub fn for_kind(&self, kind: ReportKind) -> Result<&KindConfig> {
        let section = match kind {
            ReportKind::Metar => self.metar.as_ref(),
            ReportKind::Taf => self.taf.as_ref(),
        };
        let section = section.ok_or(ConfigError::MissingKind(kind))?;
        section.validate(kind)?;
        Ok(section)
    }
}

impl KindConfig {
    fn validate(&self, kind: ReportKind) -> Result<()> {
        let invalid = |message: &str| ConfigError::Invalid {
            kind,
            message: message.to_string(),
        };

        if self.fetch_command.is_empty() {
            return Err(invalid("fetch-command is empty"));
        }
        if self.poll_minutes.is_empty() {
            return Err(invalid("poll-minutes is empty"));
        }
        if let Some(m) = self.poll_minutes.iter().find(|&&m| m >= 60) {
            return Err(invalid(&format!("poll-minutes contains {m}, must be below 60")));
        }
        if self.stations.is_empty() {
            return Err(invalid("stations is empty"));
        }
        Ok(())
    }
}
