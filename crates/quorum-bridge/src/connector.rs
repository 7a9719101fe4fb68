//! Consumed external interfaces: the peer ledgers and the audit sink.

use async_trait::async_trait;
use quorum_types::AuditRecord;
use thiserror::Error;
use tokio::sync::Mutex;

/// A peer ledger's failure, as seen by the bridge.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerFault {
    /// The ledger processed the request and said no.
    #[error("ledger rejected the request: {reason}")]
    Rejected { reason: String },
    /// The ledger could not be reached inside the deadline.
    #[error("ledger unreachable: {reason}")]
    Unreachable { reason: String },
}

/// One independent ledger instance the bridge can move value against.
///
/// Implementations must make `place_hold` and `confirm_credit` idempotent
/// on retry, keyed by the returned lock id and the external reference
/// respectively; the bridge relies on that for caller-driven retries.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    /// Place a bounded-duration hold on `amount` in `account`.
    async fn place_hold(
        &self,
        account: &str,
        amount: i64,
        currency: &str,
        duration_secs: u64,
    ) -> Result<String, LedgerFault>;

    /// Release a previously placed hold.
    async fn release_hold(&self, lock_id: &str) -> Result<(), LedgerFault>;

    /// Confirm the credit on the receiving side, keyed by `external_ref`.
    async fn confirm_credit(
        &self,
        account: &str,
        amount: i64,
        currency: &str,
        external_ref: &str,
    ) -> Result<String, LedgerFault>;

    /// Hex checksum of the account's post-state, for settlement proofs.
    async fn post_state_checksum(&self, account: &str) -> Result<String, LedgerFault>;
}

/// Ordered audit trail sink. Records are opaque to the bridge; the sink
/// must accept them in the order supplied.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: AuditRecord) -> Result<(), LedgerFault>;
}

/// In-memory audit sink for tests and demos. Keeps records in append
/// order behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The records appended so far, in order.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<(), LedgerFault> {
        self.records.lock().await.push(record);
        Ok(())
    }
}
