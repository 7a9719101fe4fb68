//! Compliance reporting engine: immutable, checksum-sealed reports over
//! ledger entries and audit records.
//!
//! Generation is read-only over its inputs and freely parallel across
//! reports; the only mutable state is the report under construction,
//! owned by the generating thread until it is sealed. A report's content
//! is frozen by its checksum; the workflow state machine governs
//! everything that happens to it afterwards.

pub mod error;
pub mod filter;
pub mod report;
pub mod risk;
pub mod workflow;

pub use error::ReportError;
pub use filter::{EntryFilter, filter_entries, glob_match};
pub use report::{
    PeriodType, aggregate_by_period, generate_report, merge_reports, report_checksum,
    validate_report_integrity,
};
pub use risk::{
    FLAG_CROSS_BORDER, FLAG_HIGH_VALUE, FLAG_NEW_ACCOUNT, FLAG_RAPID_MOVEMENT, FLAG_ROUND_AMOUNT,
    FLAG_STRUCTURED, compute_risk_score, flag_transaction,
};
pub use workflow::{is_valid_report_transition, transition_report_status};
