//! Canonical byte layout for journal hashing.
//!
//! The chain is only as tamper-evident as the serialization is
//! deterministic, so the layout is fixed here and pinned by digest tests:
//! big-endian fixed-width integers, `u32`-BE length prefixes on every
//! variable-width field, raw bytes for payloads. Timestamps enter as
//! milliseconds since the Unix epoch.

use chrono::{DateTime, Utc};
use quorum_types::{EventDraft, JournalEvent};
use sha2::{Digest, Sha256};

fn update_str(hasher: &mut Sha256, s: &str) {
    let bytes = s.as_bytes();
    hasher.update((bytes.len() as u32).to_be_bytes());
    hasher.update(bytes);
}

fn update_bytes(hasher: &mut Sha256, b: &[u8]) {
    hasher.update((b.len() as u32).to_be_bytes());
    hasher.update(b);
}

/// Hash the covered event fields: (sequence, event id, kind, aggregate id,
/// timestamp, payload, prev hash). Causation and correlation ids are
/// routing metadata and stay outside the chain.
pub fn event_hash(
    sequence: u64,
    event_id: &str,
    kind_name: &str,
    aggregate_id: &str,
    timestamp: DateTime<Utc>,
    payload: &[u8],
    prev_hash: &[u8],
) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(sequence.to_be_bytes());
    update_str(&mut hasher, event_id);
    update_str(&mut hasher, kind_name);
    update_str(&mut hasher, aggregate_id);
    hasher.update(timestamp.timestamp_millis().to_be_bytes());
    update_bytes(&mut hasher, payload);
    update_bytes(&mut hasher, prev_hash);
    hasher.finalize().to_vec()
}

/// Hash a draft as it would be sealed at `sequence` after `prev_hash`.
pub fn draft_hash(draft: &EventDraft, sequence: u64, prev_hash: &[u8]) -> Vec<u8> {
    event_hash(
        sequence,
        &draft.event_id,
        draft.kind.name(),
        &draft.aggregate_id,
        draft.timestamp,
        &draft.payload,
        prev_hash,
    )
}

/// Recompute a sealed event's hash from its own fields.
pub fn recompute_hash(event: &JournalEvent) -> Vec<u8> {
    event_hash(
        event.sequence,
        &event.event_id,
        event.kind.name(),
        &event.aggregate_id,
        event.timestamp,
        &event.payload,
        &event.prev_hash,
    )
}

/// Hash opaque snapshot state bytes.
pub fn state_hash(state: &[u8]) -> Vec<u8> {
    Sha256::digest(state).to_vec()
}
