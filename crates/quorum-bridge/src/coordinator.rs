//! The transfer coordinator: owns the ledger registry, drives the
//! lock → confirm → settle protocol, and journals every lifecycle step.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use quorum_journal::Journal;
use quorum_types::{
    AuditRecord, BridgeTransfer, EventDraft, EventKind, LedgerEntry, SettlementProof,
    TransferStatus, service_spec, validate_currency,
};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::connector::{AuditSink, LedgerConnector, LedgerFault};
use crate::error::BridgeError;
use crate::lifecycle::sweep_expired;

/// The journal handle shared between the bridge and its readers. Writers
/// take the write half; concurrent readers are unrestricted.
pub type SharedJournal = Arc<RwLock<Journal>>;

/// Policy knobs for the coordinator.
#[derive(Clone, Copy, Debug)]
pub struct BridgeConfig {
    rpc_deadline: Duration,
    lock_duration_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        // The declared bridge SLO bounds every single ledger round trip.
        let latency_ms = service_spec("bridge")
            .map(|s| s.slo.target_latency_ms)
            .unwrap_or(200);
        Self {
            rpc_deadline: Duration::from_millis(latency_ms),
            lock_duration_secs: 300,
        }
    }
}

impl BridgeConfig {
    pub fn rpc_deadline(mut self, deadline: Duration) -> Self {
        self.rpc_deadline = deadline;
        self
    }

    pub fn lock_duration_secs(mut self, secs: u64) -> Self {
        self.lock_duration_secs = secs;
        self
    }

    pub fn default_lock_duration_secs(&self) -> u64 {
        self.lock_duration_secs
    }
}

/// Result of a lock attempt. Rejection leaves the transfer untouched and
/// carries the ledger's reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LockOutcome {
    Granted { lock_id: String, expires_at: u64 },
    Rejected { reason: String },
}

/// Coordinates atomic transfers between registered ledgers.
///
/// Operations on a single transfer are serialized by `&mut` ownership of
/// the transfer itself; operations on different transfers are
/// independent. Ledger calls run under the configured RPC deadline, and
/// a lapsed deadline surfaces as an unreachable-ledger fault.
pub struct BridgeCoordinator {
    ledgers: HashMap<String, Arc<dyn LedgerConnector>>,
    journal: SharedJournal,
    audit: Arc<dyn AuditSink>,
    config: BridgeConfig,
}

impl BridgeCoordinator {
    pub fn new(journal: SharedJournal, audit: Arc<dyn AuditSink>, config: BridgeConfig) -> Self {
        Self {
            ledgers: HashMap::new(),
            journal,
            audit,
            config,
        }
    }

    /// Register a peer ledger under its id.
    pub fn register_ledger(&mut self, ledger_id: impl Into<String>, ledger: Arc<dyn LedgerConnector>) {
        self.ledgers.insert(ledger_id.into(), ledger);
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Create a Pending transfer from a source ledger entry.
    ///
    /// Copies amount, currency, and source account from the entry;
    /// assigns a fresh transfer id. Both ledgers must be registered and
    /// the entry must carry positive funds in a valid currency.
    pub async fn initiate(
        &self,
        source_ledger: &str,
        source_entry: &LedgerEntry,
        target_ledger: &str,
        target_account: &str,
    ) -> Result<BridgeTransfer, BridgeError> {
        for ledger_id in [source_ledger, target_ledger] {
            if !self.ledgers.contains_key(ledger_id) {
                return Err(BridgeError::UnknownLedger {
                    ledger_id: ledger_id.to_string(),
                });
            }
        }
        if source_entry.amount <= 0 {
            return Err(BridgeError::InsufficientFunds {
                amount: source_entry.amount,
            });
        }
        validate_currency(&source_entry.currency)?;

        let transfer = BridgeTransfer {
            id: Uuid::new_v4().to_string(),
            source_ledger: source_ledger.to_string(),
            target_ledger: target_ledger.to_string(),
            source_account: source_entry.account.clone(),
            target_account: target_account.to_string(),
            amount: source_entry.amount,
            currency: source_entry.currency.clone(),
            initiated_at: now_epoch(),
            status: TransferStatus::Pending,
            lock_id: None,
            confirmation_id: None,
            expires_at: None,
        };

        debug!(transfer_id = %transfer.id, amount = transfer.amount, "transfer initiated");
        self.record(&transfer, "initiate", EventKind::Transfer).await?;
        Ok(transfer)
    }

    /// Place the source-side hold. Pending → Locked on success; any
    /// rejection (wrong state, unreachable ledger, ledger refusal) leaves
    /// the status unchanged and reports the reason.
    pub async fn lock_funds(
        &self,
        transfer: &mut BridgeTransfer,
        duration_secs: u64,
    ) -> Result<LockOutcome, BridgeError> {
        if transfer.status != TransferStatus::Pending {
            warn!(transfer_id = %transfer.id, status = %transfer.status, "lock refused");
            return Ok(LockOutcome::Rejected {
                reason: format!("transfer is {}, lock requires Pending", transfer.status),
            });
        }
        let ledger = self.ledger(&transfer.source_ledger)?;

        let held = self
            .with_deadline(
                "place_hold",
                ledger.place_hold(
                    &transfer.source_account,
                    transfer.amount,
                    &transfer.currency,
                    duration_secs,
                ),
            )
            .await;

        match held {
            Ok(lock_id) => {
                let expires_at = now_epoch() + duration_secs;
                transfer.status = TransferStatus::Locked;
                transfer.lock_id = Some(lock_id.clone());
                transfer.expires_at = Some(expires_at);
                debug!(transfer_id = %transfer.id, %lock_id, expires_at, "funds locked");
                self.record(transfer, "lock", EventKind::Transfer).await?;
                Ok(LockOutcome::Granted { lock_id, expires_at })
            }
            Err(fault) => {
                warn!(transfer_id = %transfer.id, %fault, "lock rejected by ledger");
                Ok(LockOutcome::Rejected {
                    reason: fault.to_string(),
                })
            }
        }
    }

    /// Ask the target ledger to confirm the credit, keyed by the transfer
    /// id so retries are idempotent. Returns the ledger's confirmation id
    /// for a subsequent [`Self::confirm_receipt`].
    pub async fn request_target_credit(
        &self,
        transfer: &BridgeTransfer,
    ) -> Result<String, BridgeError> {
        let ledger = self.ledger(&transfer.target_ledger)?;
        self.with_deadline(
            "confirm_credit",
            ledger.confirm_credit(
                &transfer.target_account,
                transfer.amount,
                &transfer.currency,
                &transfer.id,
            ),
        )
        .await
        .map_err(|fault| BridgeError::Ledger {
            operation: "confirm_credit",
            fault,
        })
    }

    /// Record the target-side confirmation. Locked → Confirmed when the
    /// id is well-formed; replaying the same id on an already-Confirmed
    /// transfer is a no-op success. Every other case is silently refused:
    /// duplicate confirmations arriving after timeout must not raise.
    pub async fn confirm_receipt(
        &self,
        transfer: &mut BridgeTransfer,
        confirmation_id: &str,
    ) -> Result<bool, BridgeError> {
        if transfer.status == TransferStatus::Confirmed
            && transfer.confirmation_id.as_deref() == Some(confirmation_id)
        {
            return Ok(true);
        }
        if transfer.status != TransferStatus::Locked {
            warn!(transfer_id = %transfer.id, status = %transfer.status, "confirm refused");
            return Ok(false);
        }
        if confirmation_id.is_empty() || !confirmation_id.bytes().all(|b| b.is_ascii_graphic()) {
            warn!(transfer_id = %transfer.id, "malformed confirmation id refused");
            return Ok(false);
        }

        transfer.status = TransferStatus::Confirmed;
        transfer.confirmation_id = Some(confirmation_id.to_string());
        debug!(transfer_id = %transfer.id, confirmation_id, "receipt confirmed");
        self.record(transfer, "confirm", EventKind::Transfer).await?;
        Ok(true)
    }

    /// Settle a Confirmed transfer: fetch both post-state checksums,
    /// transition to Settled, and return the proof. `None` means the
    /// transfer was not Confirmed. A ledger fault is surfaced and leaves
    /// the transfer Confirmed so a later retry can settle it.
    pub async fn settle_transfer(
        &self,
        transfer: &mut BridgeTransfer,
        witnesses: &[String],
    ) -> Result<Option<SettlementProof>, BridgeError> {
        if transfer.status != TransferStatus::Confirmed {
            warn!(transfer_id = %transfer.id, status = %transfer.status, "settle refused");
            return Ok(None);
        }
        let source = self.ledger(&transfer.source_ledger)?;
        let target = self.ledger(&transfer.target_ledger)?;

        let source_checksum = self
            .with_deadline(
                "post_state_checksum",
                source.post_state_checksum(&transfer.source_account),
            )
            .await
            .map_err(|fault| BridgeError::Ledger {
                operation: "post_state_checksum",
                fault,
            })?;
        let target_checksum = self
            .with_deadline(
                "post_state_checksum",
                target.post_state_checksum(&transfer.target_account),
            )
            .await
            .map_err(|fault| BridgeError::Ledger {
                operation: "post_state_checksum",
                fault,
            })?;

        transfer.status = TransferStatus::Settled;
        let proof = SettlementProof {
            transfer_id: transfer.id.clone(),
            source_checksum,
            target_checksum,
            settled_at: now_epoch(),
            witnesses: witnesses.to_vec(),
        };
        debug!(transfer_id = %transfer.id, witnesses = witnesses.len(), "transfer settled");
        self.record(transfer, "settle", EventKind::Settlement).await?;
        Ok(Some(proof))
    }

    /// Roll back a Pending or Locked transfer, releasing any held lock.
    /// Disallowed states return `false` and mutate nothing. A failed
    /// release is surfaced and leaves the transfer untouched.
    pub async fn rollback(&self, transfer: &mut BridgeTransfer) -> Result<bool, BridgeError> {
        if !matches!(
            transfer.status,
            TransferStatus::Pending | TransferStatus::Locked
        ) {
            warn!(transfer_id = %transfer.id, status = %transfer.status, "rollback refused");
            return Ok(false);
        }

        if let Some(lock_id) = transfer.lock_id.clone() {
            let ledger = self.ledger(&transfer.source_ledger)?;
            self.with_deadline("release_hold", ledger.release_hold(&lock_id))
                .await
                .map_err(|fault| BridgeError::Ledger {
                    operation: "release_hold",
                    fault,
                })?;
        }

        transfer.status = TransferStatus::RolledBack;
        debug!(transfer_id = %transfer.id, "transfer rolled back");
        self.record(transfer, "rollback", EventKind::Transfer).await?;
        Ok(true)
    }

    /// Sweep Locked transfers whose expiry has passed, journaling one
    /// expiry event per transfer. Returns the expired ids.
    pub async fn expire_locks(
        &self,
        transfers: &mut [BridgeTransfer],
        now_epoch: u64,
    ) -> Result<Vec<String>, BridgeError> {
        let expired = sweep_expired(transfers, now_epoch);
        for id in &expired {
            if let Some(transfer) = transfers.iter().find(|t| &t.id == id) {
                debug!(transfer_id = %id, "lock expired");
                self.record(transfer, "expire", EventKind::Transfer).await?;
            }
        }
        Ok(expired)
    }

    fn ledger(&self, ledger_id: &str) -> Result<&Arc<dyn LedgerConnector>, BridgeError> {
        self.ledgers
            .get(ledger_id)
            .ok_or_else(|| BridgeError::UnknownLedger {
                ledger_id: ledger_id.to_string(),
            })
    }

    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, LedgerFault>>,
    ) -> Result<T, LedgerFault> {
        match timeout(self.config.rpc_deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(LedgerFault::Unreachable {
                reason: format!("{operation} exceeded the RPC deadline"),
            }),
        }
    }

    /// Append the lifecycle event for `phase` to the journal and mirror
    /// it into the audit trail. Event ids are keyed by (transfer, phase)
    /// so a duplicate emission is rejected by the journal's dedup.
    async fn record(
        &self,
        transfer: &BridgeTransfer,
        phase: &'static str,
        kind: EventKind,
    ) -> Result<(), BridgeError> {
        let payload = serde_json::json!({
            "transfer_id": transfer.id,
            "status": transfer.status.name(),
            "amount": transfer.amount,
            "currency": transfer.currency,
        })
        .to_string()
        .into_bytes();

        let draft = EventDraft::new(
            format!("{}:{phase}", transfer.id),
            kind,
            transfer.id.clone(),
            Utc::now(),
            payload.clone(),
        )
        .correlated(transfer.id.clone());
        self.journal.write().await.append(draft)?;

        self.audit
            .append(AuditRecord {
                record_id: format!("{}:{phase}", transfer.id),
                event_type: format!("bridge.{phase}"),
                actor_id: "bridge".to_string(),
                timestamp: Utc::now(),
                payload,
            })
            .await
            .map_err(|fault| BridgeError::Audit { fault })?;
        Ok(())
    }
}

fn now_epoch() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
