use quorum_journal::JournalError;
use quorum_types::DomainError;
use thiserror::Error;

use crate::connector::LedgerFault;

/// Errors surfaced by bridge operations.
///
/// State-machine refusals (confirming an unlocked transfer, rolling back
/// a settled one) are boolean results on the operations themselves, not
/// errors: the bridge must tolerate duplicates and stragglers arriving
/// after timeout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("unknown ledger '{ledger_id}'")]
    UnknownLedger { ledger_id: String },
    #[error("insufficient funds: source entry amount {amount}")]
    InsufficientFunds { amount: i64 },
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("ledger fault during {operation}: {fault}")]
    Ledger {
        operation: &'static str,
        fault: LedgerFault,
    },
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error("audit sink refused: {fault}")]
    Audit { fault: LedgerFault },
}
