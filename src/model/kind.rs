//! Report kinds: the bulletin family a process polls for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The bulletin family. Fixed for the lifetime of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Routine aerodrome observations.
    Metar,

    /// Terminal aerodrome forecasts.
    Taf,
}

impl ReportKind {
    /// Lowercase name used on the command line, in config sections, and in file names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Metar => "metar",
            Self::Taf => "taf",
        }
    }

    /// File name of the baseline snapshot, e.g. `all_metars.json`.
    pub fn baseline_file_name(self) -> String {
        format!("all_{}s.json", self.name())
    }

    /// File name of the latest-updates snapshot, e.g. `updated_tafs.json`.
    pub fn updates_file_name(self) -> String {
        format!("updated_{}s.json", self.name())
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
