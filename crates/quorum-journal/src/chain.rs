//! Sealing drafts into the chain and validating chain integrity.

use quorum_types::{EventDraft, JournalEvent};

use crate::canonical::{draft_hash, recompute_hash};
use crate::error::JournalError;

/// Why a chain scan stopped at an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainFaultKind {
    /// The event's stored hash does not match its recomputed hash.
    HashMismatch,
    /// The event's prev hash does not equal the previous event's hash.
    PrevHashMismatch,
    /// Sequence is not exactly one above the previous event's.
    SequenceGap { expected: u64, actual: u64 },
    /// The first event carries a non-empty prev hash.
    GenesisPrevHashNotEmpty,
}

/// The zero-based index of the first event that breaks the chain, plus
/// what broke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainFault {
    pub index: usize,
    pub kind: ChainFaultKind,
}

impl std::fmt::Display for ChainFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ChainFaultKind::HashMismatch => {
                write!(f, "event at index {} fails hash recomputation", self.index)
            }
            ChainFaultKind::PrevHashMismatch => {
                write!(f, "event at index {} breaks the prev-hash link", self.index)
            }
            ChainFaultKind::SequenceGap { expected, actual } => write!(
                f,
                "event at index {} has sequence {actual}, expected {expected}",
                self.index
            ),
            ChainFaultKind::GenesisPrevHashNotEmpty => write!(
                f,
                "first event at index {} has a non-empty prev hash",
                self.index
            ),
        }
    }
}

impl std::error::Error for ChainFault {}

/// Seal a draft against its predecessor: assign the next sequence, link
/// the prev hash, and compute the self hash.
///
/// `prev` is `None` only for the first event of a journal. Malformed
/// drafts (empty event id or aggregate id) are rejected; duplicate-id
/// detection is the journal instance's job, since it needs the full id
/// set.
pub fn seal_event(
    draft: EventDraft,
    prev: Option<&JournalEvent>,
) -> Result<JournalEvent, JournalError> {
    if draft.event_id.is_empty() {
        return Err(JournalError::MalformedEvent {
            reason: "empty event id",
        });
    }
    if draft.aggregate_id.is_empty() {
        return Err(JournalError::MalformedEvent {
            reason: "empty aggregate id",
        });
    }

    let (sequence, prev_hash) = match prev {
        Some(p) => (p.sequence + 1, p.hash.clone()),
        None => (1, Vec::new()),
    };
    let hash = draft_hash(&draft, sequence, &prev_hash);

    Ok(JournalEvent {
        sequence,
        event_id: draft.event_id,
        kind: draft.kind,
        aggregate_id: draft.aggregate_id,
        timestamp: draft.timestamp,
        payload: draft.payload,
        prev_hash,
        hash,
        causation_id: draft.causation_id,
        correlation_id: draft.correlation_id,
    })
}

/// Scan a sequence-ordered slice and verify hashes, prev-hash links, and
/// sequence density. Returns the first fault, or `Ok` for a valid chain
/// (the empty chain is valid).
pub fn validate_chain(events: &[JournalEvent]) -> Result<(), ChainFault> {
    for (index, event) in events.iter().enumerate() {
        if index == 0 {
            if !event.prev_hash.is_empty() && event.sequence == 1 {
                return Err(ChainFault {
                    index,
                    kind: ChainFaultKind::GenesisPrevHashNotEmpty,
                });
            }
        } else {
            let prev = &events[index - 1];
            let expected = prev.sequence + 1;
            if event.sequence != expected {
                return Err(ChainFault {
                    index,
                    kind: ChainFaultKind::SequenceGap {
                        expected,
                        actual: event.sequence,
                    },
                });
            }
            if event.prev_hash != prev.hash {
                return Err(ChainFault {
                    index,
                    kind: ChainFaultKind::PrevHashMismatch,
                });
            }
        }
        if recompute_hash(event) != event.hash {
            return Err(ChainFault {
                index,
                kind: ChainFaultKind::HashMismatch,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use quorum_types::EventKind;

    use super::*;

    fn draft(id: &str, payload: &[u8]) -> EventDraft {
        EventDraft::new(
            id,
            EventKind::Transfer,
            "acct-1",
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            payload.to_vec(),
        )
    }

    fn chain_of(n: usize) -> Vec<JournalEvent> {
        let mut events: Vec<JournalEvent> = Vec::new();
        for i in 0..n {
            let sealed = seal_event(draft(&format!("evt-{i}"), &[i as u8]), events.last()).unwrap();
            events.push(sealed);
        }
        events
    }

    #[test]
    fn sealing_assigns_dense_sequences_from_one() {
        let events = chain_of(3);
        let seqs: Vec<u64> = events.iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, [1, 2, 3]);
        assert!(events[0].prev_hash.is_empty());
        assert_eq!(events[1].prev_hash, events[0].hash);
        assert_eq!(events[2].prev_hash, events[1].hash);
    }

    #[test]
    fn sealing_rejects_empty_ids() {
        let err = seal_event(draft("", b"x"), None).unwrap_err();
        assert!(matches!(err, JournalError::MalformedEvent { .. }));

        let mut d = draft("evt-1", b"x");
        d.aggregate_id = String::new();
        let err = seal_event(d, None).unwrap_err();
        assert!(matches!(err, JournalError::MalformedEvent { .. }));
    }

    #[test]
    fn single_sealed_event_validates() {
        let events = chain_of(1);
        assert_eq!(validate_chain(&events), Ok(()));
    }

    #[test]
    fn empty_chain_is_valid() {
        assert_eq!(validate_chain(&[]), Ok(()));
    }

    #[test]
    fn tampered_payload_is_located() {
        // Append three events, mutate event #2's payload out of band.
        let mut events = chain_of(3);
        events[1].payload = b"tampered".to_vec();

        let fault = validate_chain(&events).unwrap_err();
        assert_eq!(fault.index, 1);
        assert_eq!(fault.kind, ChainFaultKind::HashMismatch);
    }

    #[test]
    fn broken_link_is_located() {
        let mut events = chain_of(3);
        events[2].prev_hash = vec![0; 32];
        // Re-seal the hash so only the link is wrong.
        events[2].hash = crate::canonical::recompute_hash(&events[2]);

        let fault = validate_chain(&events).unwrap_err();
        assert_eq!(fault.index, 2);
        assert_eq!(fault.kind, ChainFaultKind::PrevHashMismatch);
    }

    #[test]
    fn sequence_gap_is_located() {
        let mut events = chain_of(3);
        events[2].sequence = 9;

        let fault = validate_chain(&events).unwrap_err();
        assert_eq!(fault.index, 2);
        assert_eq!(
            fault.kind,
            ChainFaultKind::SequenceGap {
                expected: 3,
                actual: 9
            }
        );
    }
}
