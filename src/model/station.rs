//! Station identifiers and the default station universe.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Stations a fresh baseline is seeded with when the config names none.
pub const DEFAULT_STATIONS: &[&str] = &[
    "ZBAA", "ZBTJ", "ZBSJ", "ZBYN", "ZBHH", "ZYTX", "ZYTL", "ZYCC", "ZYHB", "ZSSS", "ZSPD",
    "ZSNJ", "ZSOF", "ZSHC", "ZSNB", "ZSFZ", "ZSAM", "ZSQD", "ZHHH", "ZHCC", "ZGHA", "ZGGG",
    "ZGOW", "ZGSZ", "ZGNN", "ZGKL", "ZJHK", "ZJSY", "ZUCK", "ZUUU", "ZPPP", "ZLXY", "ZLLL",
    "ZWWW", "ZWSH", "VHHH", "VMMC", "ZUGY", "RCSS", "RCKH", "RCTP",
];

/// [`DEFAULT_STATIONS`] as owned identifiers.
pub fn default_stations() -> Vec<StationId> {
    DEFAULT_STATIONS.iter().copied().map(StationId::from).collect()
}

/// An ICAO-style station identifier, e.g. `ZBAA`.
///
/// Opaque: no format is enforced, so unknown stations pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for StationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_has_no_duplicates() {
        let mut stations = default_stations();
        let before = stations.len();
        stations.sort();
        stations.dedup();

        assert_eq!(stations.len(), before);
        assert_eq!(before, 41);
    }
}
