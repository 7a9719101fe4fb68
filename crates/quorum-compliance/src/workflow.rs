//! The report workflow state machine.

use quorum_types::{ComplianceReport, REPORT_TRANSITIONS, ReportStatus};
use tracing::{debug, warn};

/// Whether `from → to` is one of the five permitted workflow edges.
pub fn is_valid_report_transition(from: ReportStatus, to: ReportStatus) -> bool {
    REPORT_TRANSITIONS.contains(&(from, to))
}

/// Advance a report's workflow status. Any edge outside the table is
/// refused without mutation; stages cannot be skipped and Archived is
/// final.
pub fn transition_report_status(
    report: &mut ComplianceReport,
    new_status: ReportStatus,
    actor: &str,
) -> bool {
    if !is_valid_report_transition(report.status, new_status) {
        warn!(
            report_id = %report.id,
            from = %report.status,
            to = %new_status,
            actor,
            "report transition refused"
        );
        return false;
    }
    debug!(report_id = %report.id, from = %report.status, to = %new_status, actor, "report advanced");
    report.status = new_status;
    true
}
