use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five report families produced by the compliance engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    TransactionSummary,
    RiskExposure,
    AuditExtract,
    SettlementReconciliation,
    RegulatoryFiling,
}

impl ReportKind {
    /// Returns the variant name as a static string for checksums and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransactionSummary => "TransactionSummary",
            Self::RiskExposure => "RiskExposure",
            Self::AuditExtract => "AuditExtract",
            Self::SettlementReconciliation => "SettlementReconciliation",
            Self::RegulatoryFiling => "RegulatoryFiling",
        }
    }
}

/// Workflow status of a report. Draft is the sole initial state and
/// Archived is terminal; no stage may be skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Draft,
    Generated,
    Reviewed,
    Approved,
    Submitted,
    /// Terminal.
    Archived,
}

impl ReportStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Generated => "Generated",
            Self::Reviewed => "Reviewed",
            Self::Approved => "Approved",
            Self::Submitted => "Submitted",
            Self::Archived => "Archived",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The report workflow as data: the five permitted edges, in stage order.
pub const REPORT_TRANSITIONS: &[(ReportStatus, ReportStatus)] = &[
    (ReportStatus::Draft, ReportStatus::Generated),
    (ReportStatus::Generated, ReportStatus::Reviewed),
    (ReportStatus::Reviewed, ReportStatus::Approved),
    (ReportStatus::Approved, ReportStatus::Submitted),
    (ReportStatus::Submitted, ReportStatus::Archived),
];

/// One line of a sealed report: a ledger entry enriched with the risk
/// score and flags computed at generation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub transaction_id: String,
    pub account: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    pub risk_score: f64,
    pub flags: BTreeSet<String>,
}

/// Aggregate totals over a report's entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_entries: u64,
    /// Entries carrying at least one flag.
    pub flagged_entries: u64,
    /// Audit records observed inside the report period.
    pub audit_records: u64,
    /// Total volume in minor units, keyed by currency.
    pub volume_by_currency: BTreeMap<String, i64>,
}

/// An immutable, checksum-sealed compliance report.
///
/// Content fields (id, kind, period, entries, summary) are covered by the
/// checksum; workflow fields (status, actor, epoch) are not, so status
/// transitions never invalidate a sealed report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub id: String,
    pub kind: ReportKind,
    pub status: ReportStatus,
    /// Epoch seconds at generation.
    pub generated_at: u64,
    pub generated_by: String,
    pub period_start: DateTime<Utc>,
    /// Exclusive bound.
    pub period_end: DateTime<Utc>,
    /// SHA-256 hex over the canonical content rendering.
    pub checksum: String,
    pub summary: ReportSummary,
    pub entries: Vec<ReportEntry>,
}
