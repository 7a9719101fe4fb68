//! Hash-chained, append-only event journal: the system of record.
//!
//! The journal assigns dense 1-indexed sequence numbers, links events by
//! SHA-256 over a canonical serialization, deduplicates by event id, and
//! serves sequence-ordered reads. Replay, projections, snapshots, and
//! compaction are pure functions over event slices; only [`Journal`]
//! itself is stateful, and `&mut self` on append is the per-instance
//! serialization point.

pub mod canonical;
pub mod chain;
pub mod error;
pub mod journal;
pub mod replay;
pub mod snapshot;

pub use canonical::{event_hash, state_hash};
pub use chain::{ChainFault, ChainFaultKind, seal_event, validate_chain};
pub use error::JournalError;
pub use journal::{Journal, JournalConfig};
pub use replay::{ReplayOutcome, deduplicate, replay, update_projection};
pub use snapshot::{capture_snapshot, compact};
