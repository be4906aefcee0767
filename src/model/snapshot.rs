//! Snapshots: station → report text.

use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

use super::StationId;

/// Last known report text per station.
///
/// Serialized as a flat JSON object so the files on disk stay readable by
/// anything that understands `{"ZBAA": "METAR ZBAA ..."}`. An empty string
/// means no report has been seen for that station yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<StationId, String>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot mapping every station to the empty report.
    pub fn blank<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = StationId>,
    {
        Self(stations.into_iter().map(|id| (id, String::new())).collect())
    }

    pub fn get(&self, station: &str) -> Option<&str> {
        self.0.get(station).map(String::as_str)
    }

    pub fn contains(&self, station: &str) -> bool {
        self.0.contains_key(station)
    }

    /// Sets the report for a station, returning the previous one.
    pub fn insert(&mut self, station: StationId, report: impl Into<String>) -> Option<String> {
        self.0.insert(station, report.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in station order.
    pub fn iter(&self) -> impl Iterator<Item = (&StationId, &str)> {
        self.0.iter().map(|(id, text)| (id, text.as_str()))
    }

    /// Station identifiers in order.
    pub fn stations(&self) -> impl Iterator<Item = &StationId> {
        self.0.keys()
    }

    /// Mutable access to an existing station's report.
    pub(crate) fn get_mut(&mut self, station: &str) -> Option<&mut String> {
        self.0.get_mut(station)
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<StationId>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Snapshot {
    type Item = (StationId, String);
    type IntoIter = btree_map::IntoIter<StationId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_maps_every_station_to_empty() {
        let snapshot = Snapshot::blank(["ZBAA", "ZSSS"].map(StationId::from));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("ZBAA"), Some(""));
        assert_eq!(snapshot.get("ZSSS"), Some(""));
        assert_eq!(snapshot.get("ZGGG"), None);
    }

    #[test]
    fn json_is_a_flat_object() {
        let snapshot: Snapshot = [("ZSSS", "TAF ZSSS"), ("ZBAA", "")].into_iter().collect();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"ZBAA":"","ZSSS":"TAF ZSSS"}"#);

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(serde_json::from_str::<Snapshot>(r#"{"ZBAA": 1}"#).is_err());
        assert!(serde_json::from_str::<Snapshot>(r#"["ZBAA"]"#).is_err());
    }
}
