//! The stateful journal instance: sequence assignment, dedup, indexes,
//! and sequence-ordered filtered reads.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use quorum_types::{EventDraft, JournalEvent};

use crate::chain::seal_event;
use crate::error::JournalError;

/// Policy knobs for a journal instance.
#[derive(Clone, Copy, Debug, Default)]
pub struct JournalConfig {
    snapshot_every: Option<u64>,
}

impl JournalConfig {
    /// Request a snapshot every `n` events per aggregate.
    pub fn snapshot_every(mut self, n: u64) -> Self {
        self.snapshot_every = Some(n);
        self
    }

    /// Whether the configured cadence asks for a snapshot at `sequence`.
    pub fn wants_snapshot(&self, sequence: u64) -> bool {
        match self.snapshot_every {
            Some(n) if n > 0 => sequence % n == 0,
            _ => false,
        }
    }
}

/// An open journal: the ordered log plus the indexes that serve filtered
/// reads.
///
/// Sequence numbers are assigned here and only here. `&mut self` on the
/// append paths is the process-wide serialization point per instance;
/// share an instance behind a lock, a single writer task, or equivalent.
#[derive(Clone, Debug)]
pub struct Journal {
    config: JournalConfig,
    events: Vec<JournalEvent>,
    /// event id → sequence, for dedup and duplicate diagnostics.
    by_event_id: HashMap<String, u64>,
    /// aggregate id → positions in `events`, in append order.
    by_aggregate: HashMap<String, Vec<usize>>,
    /// correlation id → positions in `events`, in append order.
    by_correlation: HashMap<String, Vec<usize>>,
}

impl Journal {
    /// Open an empty journal with the given policy.
    pub fn open(config: JournalConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
            by_event_id: HashMap::new(),
            by_aggregate: HashMap::new(),
            by_correlation: HashMap::new(),
        }
    }

    /// Close the journal, releasing the owned log.
    pub fn close(self) -> Vec<JournalEvent> {
        self.events
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Number of events appended so far; also the tail sequence.
    pub fn len(&self) -> u64 {
        self.events.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The most recently appended event.
    pub fn tail(&self) -> Option<&JournalEvent> {
        self.events.last()
    }

    /// Seal and append a draft against the current tail.
    ///
    /// Assigns the next sequence, links and computes hashes, and rejects
    /// duplicate event ids. On success the appended event is immediately
    /// visible to every read.
    pub fn append(&mut self, draft: EventDraft) -> Result<&JournalEvent, JournalError> {
        if let Some(first_seen) = self.by_event_id.get(&draft.event_id) {
            return Err(JournalError::DuplicateEventId {
                event_id: draft.event_id,
                first_seen: *first_seen,
            });
        }

        let sealed = seal_event(draft, self.events.last())?;
        let position = self.events.len();

        self.by_event_id
            .insert(sealed.event_id.clone(), sealed.sequence);
        self.by_aggregate
            .entry(sealed.aggregate_id.clone())
            .or_default()
            .push(position);
        if let Some(correlation) = &sealed.correlation_id {
            self.by_correlation
                .entry(correlation.clone())
                .or_default()
                .push(position);
        }

        self.events.push(sealed);
        Ok(&self.events[position])
    }

    /// Append with an explicit prev reference, verifying the caller's view
    /// of the tail before sealing.
    ///
    /// `prev` must be the current tail (`None` for an empty journal);
    /// a stale reference fails with `BrokenChain` and appends nothing.
    pub fn append_after(
        &mut self,
        draft: EventDraft,
        prev: Option<&JournalEvent>,
    ) -> Result<&JournalEvent, JournalError> {
        let tail_seq = self.len();
        let claimed = prev.map(|p| p.sequence).unwrap_or(0);
        let matches_tail = match (prev, self.events.last()) {
            (None, None) => true,
            (Some(p), Some(t)) => p.sequence == t.sequence && p.hash == t.hash,
            _ => false,
        };
        if !matches_tail {
            return Err(JournalError::BrokenChain {
                claimed,
                tail: tail_seq,
            });
        }
        self.append(draft)
    }

    /// Events with sequence strictly greater than `after`, capped at
    /// `limit`. Sequence-ordered.
    pub fn events_after(&self, after: u64, limit: usize) -> Vec<JournalEvent> {
        self.events
            .iter()
            .filter(|e| e.sequence > after)
            .take(limit)
            .cloned()
            .collect()
    }

    /// All events for one aggregate, sequence-ordered.
    pub fn aggregate_events(&self, aggregate_id: &str) -> Vec<JournalEvent> {
        self.positions(&self.by_aggregate, aggregate_id)
    }

    /// All events sharing a correlation id, sequence-ordered.
    pub fn correlation_events(&self, correlation_id: &str) -> Vec<JournalEvent> {
        self.positions(&self.by_correlation, correlation_id)
    }

    /// Events with timestamp in the half-open window `[start, end)`.
    /// Sequence-ordered.
    pub fn events_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<JournalEvent> {
        self.events
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp < end)
            .cloned()
            .collect()
    }

    /// Whether an event id has been observed.
    pub fn contains(&self, event_id: &str) -> bool {
        self.by_event_id.contains_key(event_id)
    }

    /// The full log as a slice, sequence-ordered.
    pub fn events(&self) -> &[JournalEvent] {
        &self.events
    }

    fn positions(&self, index: &HashMap<String, Vec<usize>>, key: &str) -> Vec<JournalEvent> {
        index
            .get(key)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&p| self.events[p].clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
