//! Replay, deduplication, and projection advancement.
//!
//! All three are pure folds over event slices. Replay sorts defensively
//! before folding so that the same inputs always produce bit-identical
//! state, regardless of supplied order.

use std::collections::HashSet;

use quorum_types::{JournalEvent, Projection, Snapshot};

/// Result of replaying an aggregate's events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayOutcome<S> {
    pub state: S,
    /// Highest sequence folded, or the snapshot/zero floor when nothing
    /// applied.
    pub last_sequence: u64,
}

/// Fold `apply` over one aggregate's events in ascending sequence order.
///
/// `initial` is the state restored from `snapshot` by the caller (or the
/// aggregate's default); events at or below the snapshot's sequence are
/// skipped. Events of other aggregates are ignored. Ties on sequence
/// (which cannot occur post-assign) break by event id, keeping the sort
/// total.
pub fn replay<S, F>(
    aggregate_id: &str,
    events: &[JournalEvent],
    snapshot: Option<&Snapshot>,
    initial: S,
    mut apply: F,
) -> ReplayOutcome<S>
where
    F: FnMut(S, &JournalEvent) -> S,
{
    let floor = snapshot.map(|s| s.sequence).unwrap_or(0);

    let mut selected: Vec<&JournalEvent> = events
        .iter()
        .filter(|e| e.aggregate_id == aggregate_id && e.sequence > floor)
        .collect();
    selected.sort_by(|a, b| {
        a.sequence
            .cmp(&b.sequence)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });

    let mut state = initial;
    let mut last_sequence = floor;
    for event in selected {
        state = apply(state, event);
        last_sequence = event.sequence;
    }
    ReplayOutcome {
        state,
        last_sequence,
    }
}

/// Keep only the first occurrence of each event id, in sequence order.
///
/// Idempotent: deduplicating an already-deduplicated list is a no-op.
pub fn deduplicate(events: &[JournalEvent]) -> Vec<JournalEvent> {
    let mut ordered: Vec<&JournalEvent> = events.iter().collect();
    ordered.sort_by(|a, b| {
        a.sequence
            .cmp(&b.sequence)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });

    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();
    for event in ordered {
        if seen.insert(event.event_id.as_str()) {
            result.push(event.clone());
        }
    }
    result
}

/// Advance a projection over events with sequence strictly above its
/// `last_sequence`, in ascending order, using the caller-supplied folder.
pub fn update_projection<F>(
    mut projection: Projection,
    events: &[JournalEvent],
    mut project: F,
) -> Projection
where
    F: FnMut(Vec<u8>, &JournalEvent) -> Vec<u8>,
{
    let mut pending: Vec<&JournalEvent> = events
        .iter()
        .filter(|e| e.sequence > projection.last_sequence)
        .collect();
    pending.sort_by_key(|e| e.sequence);

    for event in pending {
        projection.state = project(std::mem::take(&mut projection.state), event);
        projection.last_sequence = event.sequence;
    }
    projection
}
