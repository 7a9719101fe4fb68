use serde::{Deserialize, Serialize};

/// Lifecycle status of a cross-ledger transfer.
///
/// Settled, RolledBack, and Expired are terminal. The valid transitions
/// are the six edges in [`TRANSFER_TRANSITIONS`]; everything else is a
/// state conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    Locked,
    Confirmed,
    /// Terminal. The only successful end state.
    Settled,
    /// Terminal.
    RolledBack,
    /// Terminal.
    Expired,
}

impl TransferStatus {
    /// Whether the transfer has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::RolledBack | Self::Expired)
    }

    /// Returns the variant name as a static string for logging and audit
    /// payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Locked => "Locked",
            Self::Confirmed => "Confirmed",
            Self::Settled => "Settled",
            Self::RolledBack => "RolledBack",
            Self::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The transfer state machine as data: every `(from, to)` edge a transfer
/// may take. Kept as a table so invariant tests can enumerate it directly.
pub const TRANSFER_TRANSITIONS: &[(TransferStatus, TransferStatus)] = &[
    (TransferStatus::Pending, TransferStatus::Locked),
    (TransferStatus::Pending, TransferStatus::RolledBack),
    (TransferStatus::Locked, TransferStatus::Confirmed),
    (TransferStatus::Locked, TransferStatus::RolledBack),
    (TransferStatus::Locked, TransferStatus::Expired),
    (TransferStatus::Confirmed, TransferStatus::Settled),
];

/// Whether `from → to` is one of the six permitted transfer edges.
pub fn is_valid_transition(from: TransferStatus, to: TransferStatus) -> bool {
    TRANSFER_TRANSITIONS.contains(&(from, to))
}

/// An atomic cross-ledger transfer owned by the bridge.
///
/// `lock_id` and `confirmation_id` are write-once: set by the lock and
/// confirm operations respectively and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeTransfer {
    pub id: String,
    pub source_ledger: String,
    pub target_ledger: String,
    pub source_account: String,
    pub target_account: String,
    /// Minor units; always positive.
    pub amount: i64,
    /// ISO-like 3-letter uppercase code.
    pub currency: String,
    /// Epoch seconds at initiation.
    pub initiated_at: u64,
    pub status: TransferStatus,
    pub lock_id: Option<String>,
    pub confirmation_id: Option<String>,
    /// Epoch seconds; set when the source-side hold is acquired.
    pub expires_at: Option<u64>,
}

impl BridgeTransfer {
    /// Whether the transfer holds or may still acquire source-side funds.
    /// Locked and Confirmed transfers count toward bridge exposure.
    pub fn is_active(&self) -> bool {
        matches!(self.status, TransferStatus::Locked | TransferStatus::Confirmed)
    }
}

/// Audit artifact emitted once a transfer settles: both post-state
/// checksums plus the witnesses that observed the settlement, in the
/// order they were supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementProof {
    pub transfer_id: String,
    /// Hex checksum of the source ledger's post-settlement state.
    pub source_checksum: String,
    /// Hex checksum of the target ledger's post-settlement state.
    pub target_checksum: String,
    /// Epoch seconds at settlement.
    pub settled_at: u64,
    pub witnesses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_six_edges_are_valid() {
        let all = [
            TransferStatus::Pending,
            TransferStatus::Locked,
            TransferStatus::Confirmed,
            TransferStatus::Settled,
            TransferStatus::RolledBack,
            TransferStatus::Expired,
        ];
        let valid: usize = all
            .iter()
            .flat_map(|from| all.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| is_valid_transition(*from, *to))
            .count();
        assert_eq!(valid, 6);
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for (from, _) in TRANSFER_TRANSITIONS {
            assert!(!from.is_terminal(), "terminal state {from} has an edge");
        }
    }

    #[test]
    fn confirmed_never_expires() {
        assert!(!is_valid_transition(
            TransferStatus::Confirmed,
            TransferStatus::Expired
        ));
        assert!(!is_valid_transition(
            TransferStatus::Confirmed,
            TransferStatus::RolledBack
        ));
    }
}
