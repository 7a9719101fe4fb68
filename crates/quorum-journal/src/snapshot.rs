//! Snapshot capture and history compaction.

use chrono::Utc;
use quorum_types::{JournalEvent, Snapshot};
use uuid::Uuid;

use crate::canonical::state_hash;

/// Capture a snapshot of an aggregate's state as of `sequence`.
///
/// The caller is responsible for having read the state at a consistent
/// point; the journal hashes the bytes without interpreting them.
pub fn capture_snapshot(aggregate_id: &str, state: &[u8], sequence: u64) -> Snapshot {
    Snapshot {
        snapshot_id: Uuid::new_v4().to_string(),
        aggregate_id: aggregate_id.to_string(),
        sequence,
        timestamp: Utc::now(),
        state: state.to_vec(),
        state_hash: state_hash(state),
    }
}

/// Drop the snapshot aggregate's events at or below the snapshot
/// sequence. Events of other aggregates are preserved untouched.
///
/// Returns the surviving events and the number removed.
pub fn compact(events: &[JournalEvent], snapshot: &Snapshot) -> (Vec<JournalEvent>, usize) {
    let before = events.len();
    let survivors: Vec<JournalEvent> = events
        .iter()
        .filter(|e| e.aggregate_id != snapshot.aggregate_id || e.sequence > snapshot.sequence)
        .cloned()
        .collect();
    let removed = before - survivors.len();
    (survivors, removed)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use quorum_types::{EventDraft, EventKind};

    use super::*;
    use crate::chain::seal_event;

    fn build_chain(specs: &[(&str, &str)]) -> Vec<JournalEvent> {
        let mut events: Vec<JournalEvent> = Vec::new();
        for (id, aggregate) in specs {
            let draft = EventDraft::new(
                *id,
                EventKind::Transfer,
                *aggregate,
                Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
                vec![],
            );
            let sealed = seal_event(draft, events.last()).unwrap();
            events.push(sealed);
        }
        events
    }

    #[test]
    fn snapshot_hashes_state_bytes() {
        let snapshot = capture_snapshot("a", b"state", 7);
        assert_eq!(snapshot.aggregate_id, "a");
        assert_eq!(snapshot.sequence, 7);
        assert_eq!(snapshot.state_hash, state_hash(b"state"));
        assert!(!snapshot.snapshot_id.is_empty());
    }

    #[test]
    fn compact_removes_only_the_snapshot_aggregate_below_the_floor() {
        let events = build_chain(&[("e1", "a"), ("e2", "b"), ("e3", "a"), ("e4", "a")]);
        // Snapshot of "a" as of sequence 3: e1 and e3 are covered.
        let snapshot = capture_snapshot("a", b"s", 3);

        let (survivors, removed) = compact(&events, &snapshot);
        assert_eq!(removed, 2);
        let ids: Vec<&str> = survivors.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, ["e2", "e4"]);
    }

    #[test]
    fn compact_with_a_zero_floor_removes_nothing() {
        let events = build_chain(&[("e1", "a"), ("e2", "a")]);
        let snapshot = capture_snapshot("a", b"s", 0);

        let (survivors, removed) = compact(&events, &snapshot);
        assert_eq!(removed, 0);
        assert_eq!(survivors.len(), 2);
    }
}
