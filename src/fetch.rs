//! Fetching reports: the seam between the poller and the outside world.
//!
//! The poller only needs "kind in, station → report out". How reports are
//! scraped is somebody else's problem: [`CommandFetcher`] hands it to an
//! external program that prints a JSON object on stdout.

use std::{io, process::Command};

use tracing::debug;

use crate::model::{ReportKind, Snapshot};

/// Placeholder in command arguments replaced by the report kind's name.
pub const KIND_PLACEHOLDER: &str = "{kind}";

/// Environment variable carrying the report kind to the fetch command.
pub const KIND_ENV: &str = "WXARCHIVE_KIND";

/// Errors that can occur while fetching reports.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to run `{program}`")]
    Spawn { program: String, source: io::Error },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("fetch output is not a JSON object of strings")]
    Decode(#[from] serde_json::Error),
}

/// Produces the current reports for a kind.
pub trait Fetch {
    fn fetch(&self, kind: ReportKind) -> Result<Snapshot, FetchError>;
}

/// Fetches by running an external command and decoding its stdout.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    program: String,
    args: Vec<String>,
}

impl CommandFetcher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a fetcher from a full command line, program first.
    ///
    /// Returns `None` for an empty command line.
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    fn args_for(&self, kind: ReportKind) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(KIND_PLACEHOLDER, kind.name()))
            .collect()
    }
}

impl Fetch for CommandFetcher {
    fn fetch(&self, kind: ReportKind) -> Result<Snapshot, FetchError> {
        let args = self.args_for(kind);
        debug!(program = %self.program, ?args, "running fetch command");

        let output = Command::new(&self.program)
            .args(&args)
            .env(KIND_ENV, kind.name())
            .output()
            .map_err(|source| FetchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let reports: Snapshot = serde_json::from_slice(&output.stdout)?;
        debug!(stations = reports.len(), "fetch command returned");
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandFetcher {
        CommandFetcher::new("sh", vec!["-c".into(), script.into()])
    }

    #[test]
    fn from_command_line_splits_program() {
        let command = vec!["python3".to_string(), "collect.py".into(), "{kind}".into()];
        let fetcher = CommandFetcher::from_command_line(&command).unwrap();

        assert_eq!(fetcher.program, "python3");
        assert_eq!(fetcher.args_for(ReportKind::Taf), ["collect.py", "taf"]);
    }

    #[test]
    fn from_command_line_rejects_empty() {
        assert!(CommandFetcher::from_command_line(&[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn fetch_decodes_stdout() {
        let fetcher = sh(r#"echo '{"ZBAA": "METAR ZBAA 010000Z", "ZSSS": ""}'"#);

        let reports = fetcher.fetch(ReportKind::Metar).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports.get("ZBAA"), Some("METAR ZBAA 010000Z"));
    }

    #[cfg(unix)]
    #[test]
    fn fetch_passes_kind() {
        let fetcher = CommandFetcher::new(
            "sh",
            vec![
                "-c".into(),
                r#"printf '{"arg": "%s", "env": "%s"}' "$0" "$WXARCHIVE_KIND""#.into(),
                "{kind}".into(),
            ],
        );

        let reports = fetcher.fetch(ReportKind::Taf).unwrap();

        assert_eq!(reports.get("arg"), Some("taf"));
        assert_eq!(reports.get("env"), Some("taf"));
    }

    #[cfg(unix)]
    #[test]
    fn fetch_fails_on_nonzero_exit() {
        let fetcher = sh("echo 'source unavailable' >&2; exit 3");

        let err = fetcher.fetch(ReportKind::Metar).unwrap_err();

        match err {
            FetchError::Failed { stderr, status, .. } => {
                assert_eq!(stderr, "source unavailable");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn fetch_fails_on_bad_json() {
        let fetcher = sh("echo 'not json'");

        let err = fetcher.fetch(ReportKind::Metar).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn fetch_fails_when_program_is_missing() {
        let fetcher = CommandFetcher::new("wxarchive-no-such-program", vec![]);

        let err = fetcher.fetch(ReportKind::Metar).unwrap_err();
        assert!(matches!(err, FetchError::Spawn { .. }));
    }
}
