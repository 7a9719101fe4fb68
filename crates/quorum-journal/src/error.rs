use thiserror::Error;

/// Errors surfaced by journal operations. Never retried internally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum JournalError {
    /// The event id has already been observed by this journal.
    #[error("duplicate event id '{event_id}' (first seen at sequence {first_seen})")]
    DuplicateEventId { event_id: String, first_seen: u64 },
    /// The caller's prev-event reference does not match the journal tail.
    #[error("prev reference (sequence {claimed}) does not match journal tail (sequence {tail})")]
    BrokenChain { claimed: u64, tail: u64 },
    /// The draft fails boundary validation.
    #[error("malformed event: {reason}")]
    MalformedEvent { reason: &'static str },
}
