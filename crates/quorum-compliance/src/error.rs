use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by report generation and merging. Generation failures
/// are fatal for the report; integrity and workflow refusals are boolean
/// results, not errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("invalid period: start {start} is not before end {end}")]
    InvalidPeriod {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// A streaming entry source failed mid-generation.
    #[error("data access failure: {reason}")]
    DataAccess { reason: String },
    #[error("cannot merge {first} and {second} reports")]
    IncompatibleKinds {
        first: &'static str,
        second: &'static str,
    },
    #[error("reports '{first}' and '{second}' cover overlapping periods")]
    OverlappingPeriods { first: String, second: String },
    #[error("merge requires at least one report")]
    EmptyMerge,
}
