use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categorizes a journal event by the domain activity that produced it.
///
/// Extensible: new activities are added as variants here, not as new
/// record shapes. Every kind shares the same hash-chained envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Cross-ledger transfer lifecycle (initiate, lock, confirm, rollback, expire).
    Transfer,
    /// Terminal settlement of a transfer, including the settlement proof.
    Settlement,
    /// Witness/quorum coordination decisions.
    Consensus,
    /// Operator or governance policy change.
    PolicyChange,
    /// Risk engine alert raised against an account or transfer.
    RiskAlert,
    /// Marker correlating a span of events with an external audit trail.
    AuditMarker,
}

impl EventKind {
    /// Returns the variant name as a static string for hashing, error
    /// messages, and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer => "Transfer",
            Self::Settlement => "Settlement",
            Self::Consensus => "Consensus",
            Self::PolicyChange => "PolicyChange",
            Self::RiskAlert => "RiskAlert",
            Self::AuditMarker => "AuditMarker",
        }
    }
}

/// A sealed entry in the journal's append-only, hash-chained log.
///
/// Sequence is 1-indexed, dense, and assigned by the journal at append
/// time — never by callers. `prev_hash` is empty only at sequence 1.
/// Timestamp is wall-clock; ordering is by sequence alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEvent {
    pub sequence: u64,
    /// Caller-supplied opaque id, unique across the journal.
    pub event_id: String,
    pub kind: EventKind,
    /// The entity this event mutates (an account, a transfer, ...).
    pub aggregate_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Vec<u8>,
    /// Hash of the event at `sequence - 1`; empty for the first event.
    pub prev_hash: Vec<u8>,
    /// SHA-256 over the canonical serialization of the covered fields.
    pub hash: Vec<u8>,
    /// Id of the single event that caused this one, if any. Informational;
    /// never used for ordering.
    pub causation_id: Option<String>,
    /// Id shared by all events of one logical activity.
    pub correlation_id: Option<String>,
}

impl JournalEvent {
    /// Hex rendering of the self hash, for logs and proofs.
    pub fn hash_hex(&self) -> String {
        hex::encode(&self.hash)
    }
}

/// A candidate event as submitted to append: the caller-owned fields only.
///
/// Sequence, prev hash, and self hash are assigned by the journal when the
/// draft is sealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub event_id: String,
    pub kind: EventKind,
    pub aggregate_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Vec<u8>,
    pub causation_id: Option<String>,
    pub correlation_id: Option<String>,
}

impl EventDraft {
    /// Create a draft with the required fields; causation and correlation
    /// default to none.
    pub fn new(
        event_id: impl Into<String>,
        kind: EventKind,
        aggregate_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            kind,
            aggregate_id: aggregate_id.into(),
            timestamp,
            payload,
            causation_id: None,
            correlation_id: None,
        }
    }

    /// Attach the id of the event that caused this one.
    pub fn caused_by(mut self, event_id: impl Into<String>) -> Self {
        self.causation_id = Some(event_id.into());
        self
    }

    /// Attach the id shared by this draft's logical activity.
    pub fn correlated(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}
