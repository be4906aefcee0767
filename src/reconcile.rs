//! Change detection: compare a fresh fetch against the baseline.
//!
//! Pure: no I/O, no hidden state. Persisting the result is the poller's job.

use tracing::info;

use crate::model::Snapshot;

/// The outcome of comparing a fetch against the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Fetched entries whose text differs from the baseline, including
    /// stations the baseline has never seen.
    pub delta: Snapshot,

    /// The baseline with changed texts applied. Its station set is exactly
    /// the baseline's.
    pub merged: Snapshot,
}

impl Reconciliation {
    pub fn has_updates(&self) -> bool {
        !self.delta.is_empty()
    }
}

/// Computes the delta and the merged baseline.
///
/// A station missing from `fetched` keeps its baseline text: the fetch just
/// didn't cover it this time. A station missing from `baseline` shows up in
/// the delta but never joins the merged baseline, so it is reported again
/// on every cycle.
pub fn reconcile(fetched: &Snapshot, baseline: &Snapshot) -> Reconciliation {
    let mut delta = Snapshot::new();
    let mut merged = baseline.clone();

    for (station, text) in fetched.iter() {
        if baseline.get(station.as_str()) == Some(text) {
            continue;
        }
        info!(%station, "updated");
        delta.insert(station.clone(), text);

        if let Some(known) = merged.get_mut(station.as_str()) {
            text.clone_into(known);
        }
    }

    Reconciliation { delta, merged }
}
