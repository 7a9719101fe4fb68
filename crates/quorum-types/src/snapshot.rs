use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Captured aggregate state at a specific sequence number, used to
/// accelerate replay and to anchor compaction.
///
/// State bytes are opaque to the journal; only their hash is interpreted
/// (recompute-and-compare on restore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub aggregate_id: String,
    /// Journal sequence as of capture.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub state: Vec<u8>,
    /// SHA-256 of the state bytes.
    pub state_hash: Vec<u8>,
}

/// A named, durable, incrementally-updated view over journal events.
///
/// Advanced by folding events with sequence strictly above
/// `last_sequence`; the state bytes are owned by the projection's folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub name: String,
    pub last_sequence: u64,
    pub state: Vec<u8>,
}

impl Projection {
    /// A fresh projection that has applied nothing.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_sequence: 0,
            state: Vec::new(),
        }
    }
}
