//! Report generation, sealing, merging, and period aggregation.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use quorum_types::{
    AuditRecord, ComplianceReport, LedgerEntry, ReportEntry, ReportKind, ReportStatus,
    ReportSummary,
};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::error::ReportError;
use crate::filter::EntryFilter;
use crate::risk::{compute_risk_score, flag_transaction};

/// Bucketing granularity for [`aggregate_by_period`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodType {
    Hour,
    Day,
    Week,
    Month,
}

impl PeriodType {
    /// Canonical period key for a timestamp: hour `YYYY-MM-DDTHH`, day
    /// `YYYY-MM-DD`, ISO week `YYYY-Www`, month `YYYY-MM`.
    pub fn key(&self, timestamp: DateTime<Utc>) -> String {
        match self {
            Self::Hour => timestamp.format("%Y-%m-%dT%H").to_string(),
            Self::Day => timestamp.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = timestamp.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Self::Month => timestamp.format("%Y-%m").to_string(),
        }
    }
}

/// Total volume per canonical period key.
pub fn aggregate_by_period(
    entries: &[LedgerEntry],
    period: PeriodType,
) -> BTreeMap<String, i64> {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(period.key(entry.timestamp)).or_default() += entry.amount;
    }
    totals
}

/// Generate a sealed Draft report over the supplied entries and audit
/// records.
///
/// Entries are restricted to `[period_start, period_end)`, run through
/// the filter, and enriched with a recomputed risk score and flags (the
/// full supplied slice serves as scoring history). The result is sealed
/// with its checksum before it is returned.
pub fn generate_report(
    kind: ReportKind,
    entries: &[LedgerEntry],
    audit: &[AuditRecord],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    filter: &EntryFilter,
    actor: &str,
) -> Result<ComplianceReport, ReportError> {
    if period_start >= period_end {
        return Err(ReportError::InvalidPeriod {
            start: period_start,
            end: period_end,
        });
    }

    let mut report_entries: Vec<ReportEntry> = entries
        .iter()
        .filter(|e| e.timestamp >= period_start && e.timestamp < period_end)
        .filter(|e| filter.matches(e))
        .map(|e| ReportEntry {
            transaction_id: e.transaction_id.clone(),
            account: e.account.clone(),
            amount: e.amount,
            currency: e.currency.clone(),
            timestamp: e.timestamp,
            risk_score: compute_risk_score(e, entries),
            flags: flag_transaction(e, entries),
        })
        .collect();
    report_entries.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });

    let audit_records = audit
        .iter()
        .filter(|r| r.timestamp >= period_start && r.timestamp < period_end)
        .count() as u64;

    let mut report = ComplianceReport {
        id: Uuid::new_v4().to_string(),
        kind,
        status: ReportStatus::Draft,
        generated_at: Utc::now().timestamp().max(0) as u64,
        generated_by: actor.to_string(),
        period_start,
        period_end,
        checksum: String::new(),
        summary: derive_summary(&report_entries, audit_records),
        entries: report_entries,
    };
    report.checksum = report_checksum(&report);
    debug!(
        report_id = %report.id,
        entries = report.entries.len(),
        kind = kind.name(),
        "report generated"
    );
    Ok(report)
}

fn derive_summary(entries: &[ReportEntry], audit_records: u64) -> ReportSummary {
    let mut volume_by_currency: BTreeMap<String, i64> = BTreeMap::new();
    for entry in entries {
        *volume_by_currency.entry(entry.currency.clone()).or_default() += entry.amount;
    }
    ReportSummary {
        total_entries: entries.len() as u64,
        flagged_entries: entries.iter().filter(|e| !e.flags.is_empty()).count() as u64,
        audit_records,
        volume_by_currency,
    }
}

/// Deterministic SHA-256 hex over the report's content fields.
///
/// Covered: id, kind, period bounds, entries in order, summary. Field
/// order is fixed, timestamps render as RFC 3339 UTC, risk scores at 4
/// decimals, flag sets and currency keys in their sorted order. Workflow
/// fields (status, actor, generation epoch) stay outside the checksum so
/// transitions never invalidate a sealed report.
pub fn report_checksum(report: &ComplianceReport) -> String {
    let mut canonical = String::new();
    let ts = |t: DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Micros, true);

    canonical.push_str(&report.id);
    canonical.push('\n');
    canonical.push_str(report.kind.name());
    canonical.push('\n');
    canonical.push_str(&ts(report.period_start));
    canonical.push('\n');
    canonical.push_str(&ts(report.period_end));
    canonical.push('\n');

    for entry in &report.entries {
        let flags: Vec<&str> = entry.flags.iter().map(String::as_str).collect();
        let _ = writeln!(
            canonical,
            "{}|{}|{}|{}|{}|{:.4}|{}",
            entry.transaction_id,
            entry.account,
            entry.amount,
            entry.currency,
            ts(entry.timestamp),
            entry.risk_score,
            flags.join(",")
        );
    }

    let _ = write!(
        canonical,
        "summary|{}|{}|{}",
        report.summary.total_entries, report.summary.flagged_entries, report.summary.audit_records
    );
    for (currency, volume) in &report.summary.volume_by_currency {
        let _ = write!(canonical, "|{currency}={volume}");
    }

    hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Recompute the checksum and compare with the sealed value.
pub fn validate_report_integrity(report: &ComplianceReport) -> bool {
    report_checksum(report) == report.checksum
}

/// Merge reports of one kind over pairwise-disjoint periods into a
/// single Generated report spanning their convex hull.
///
/// Entries are the sorted union (timestamp, then transaction id), the
/// summary is re-derived, and the checksum is recomputed for the merged
/// content.
pub fn merge_reports(
    reports: &[ComplianceReport],
    actor: &str,
) -> Result<ComplianceReport, ReportError> {
    let first = reports.first().ok_or(ReportError::EmptyMerge)?;

    if let Some(other) = reports.iter().find(|r| r.kind != first.kind) {
        return Err(ReportError::IncompatibleKinds {
            first: first.kind.name(),
            second: other.kind.name(),
        });
    }
    for (i, a) in reports.iter().enumerate() {
        for b in &reports[i + 1..] {
            if a.period_start < b.period_end && b.period_start < a.period_end {
                return Err(ReportError::OverlappingPeriods {
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
        }
    }

    let period_start = reports.iter().map(|r| r.period_start).min().unwrap_or(first.period_start);
    let period_end = reports.iter().map(|r| r.period_end).max().unwrap_or(first.period_end);

    let mut entries: Vec<ReportEntry> = reports.iter().flat_map(|r| r.entries.clone()).collect();
    entries.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });

    let audit_records = reports.iter().map(|r| r.summary.audit_records).sum();

    let mut merged = ComplianceReport {
        id: Uuid::new_v4().to_string(),
        kind: first.kind,
        status: ReportStatus::Generated,
        generated_at: Utc::now().timestamp().max(0) as u64,
        generated_by: actor.to_string(),
        period_start,
        period_end,
        checksum: String::new(),
        summary: derive_summary(&entries, audit_records),
        entries,
    };
    merged.checksum = report_checksum(&merged);
    debug!(report_id = %merged.id, sources = reports.len(), "reports merged");
    Ok(merged)
}
