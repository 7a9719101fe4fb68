pub mod error;
pub mod event;
pub mod ledger;
pub mod report;
pub mod snapshot;
pub mod topology;
pub mod transfer;

pub use error::{DomainError, validate_currency};
pub use event::{EventDraft, EventKind, JournalEvent};
pub use ledger::{AuditRecord, LedgerEntry};
pub use report::{
    ComplianceReport, REPORT_TRANSITIONS, ReportEntry, ReportKind, ReportStatus, ReportSummary,
};
pub use snapshot::{Projection, Snapshot};
pub use topology::{ServiceSlo, ServiceSpec, default_topology, service_spec};
pub use transfer::{
    BridgeTransfer, SettlementProof, TRANSFER_TRANSITIONS, TransferStatus, is_valid_transition,
};
