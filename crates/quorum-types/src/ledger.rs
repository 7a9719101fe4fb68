use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A posted ledger transaction as consumed by the bridge and the
/// reporting engine. The ledger's balance accounting owns these; the
/// core never mutates them.
///
/// Country codes are optional because not every rail reports them; the
/// `cross_border` flag only fires when both are present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub transaction_id: String,
    pub account: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    pub flags: BTreeSet<String>,
    /// In [0, 1].
    pub risk_score: f64,
    pub source_country: Option<String>,
    pub target_country: Option<String>,
}

impl LedgerEntry {
    pub fn new(
        transaction_id: impl Into<String>,
        account: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            account: account.into(),
            amount,
            currency: currency.into(),
            timestamp,
            flags: BTreeSet::new(),
            risk_score: 0.0,
            source_country: None,
            target_country: None,
        }
    }
}

/// An opaque audit trail record. The journal and the sinks carry these
/// without interpreting the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub record_id: String,
    pub event_type: String,
    pub actor_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Vec<u8>,
}
