//! Pure lifecycle helpers: expiry sweeps and chain validation over
//! transfer slices.

use quorum_types::{BridgeTransfer, TransferStatus};

/// Expire every Locked transfer whose expiry epoch has passed.
///
/// This is the only path into Expired. Confirmed transfers are never
/// expired, whatever their expiry epoch says; callers must drive
/// settlement or accept a stuck Confirmed transfer.
///
/// Returns the ids of the transfers expired by this sweep.
pub fn sweep_expired(transfers: &mut [BridgeTransfer], now_epoch: u64) -> Vec<String> {
    let mut expired = Vec::new();
    for transfer in transfers.iter_mut() {
        if transfer.status != TransferStatus::Locked {
            continue;
        }
        match transfer.expires_at {
            Some(expiry) if expiry <= now_epoch => {
                transfer.status = TransferStatus::Expired;
                expired.push(transfer.id.clone());
            }
            _ => {}
        }
    }
    expired
}

/// Verify that a sequence of transfers forms a routable chain: each
/// transfer's target ledger/account equals the next transfer's source
/// ledger/account. Chains of zero or one transfer are trivially valid.
pub fn validate_bridge_chain(transfers: &[BridgeTransfer]) -> bool {
    transfers.windows(2).all(|pair| {
        pair[0].target_ledger == pair[1].source_ledger
            && pair[0].target_account == pair[1].source_account
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(id: &str, status: TransferStatus, expires_at: Option<u64>) -> BridgeTransfer {
        BridgeTransfer {
            id: id.to_string(),
            source_ledger: "ledger-a".to_string(),
            target_ledger: "ledger-b".to_string(),
            source_account: "alice".to_string(),
            target_account: "bob".to_string(),
            amount: 1_000,
            currency: "USD".to_string(),
            initiated_at: 100,
            status,
            lock_id: None,
            confirmation_id: None,
            expires_at,
        }
    }

    #[test]
    fn sweep_expires_lapsed_locks_only() {
        let mut transfers = vec![
            transfer("t1", TransferStatus::Locked, Some(110)),
            transfer("t2", TransferStatus::Locked, Some(200)),
            transfer("t3", TransferStatus::Pending, None),
        ];

        let expired = sweep_expired(&mut transfers, 111);
        assert_eq!(expired, ["t1"]);
        assert_eq!(transfers[0].status, TransferStatus::Expired);
        assert_eq!(transfers[1].status, TransferStatus::Locked);
        assert_eq!(transfers[2].status, TransferStatus::Pending);
    }

    #[test]
    fn confirmed_transfers_never_expire() {
        let mut transfers = vec![transfer("t1", TransferStatus::Confirmed, Some(110))];

        let expired = sweep_expired(&mut transfers, 10_000);
        assert!(expired.is_empty());
        assert_eq!(transfers[0].status, TransferStatus::Confirmed);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let mut transfers = vec![transfer("t1", TransferStatus::Locked, Some(110))];
        assert!(sweep_expired(&mut transfers, 109).is_empty());
        assert_eq!(sweep_expired(&mut transfers, 110), ["t1"]);
    }

    #[test]
    fn chain_validation_matches_adjacent_endpoints() {
        let mut a = transfer("t1", TransferStatus::Pending, None);
        a.target_ledger = "ledger-b".to_string();
        a.target_account = "carol".to_string();

        let mut b = transfer("t2", TransferStatus::Pending, None);
        b.source_ledger = "ledger-b".to_string();
        b.source_account = "carol".to_string();

        assert!(validate_bridge_chain(&[a.clone(), b.clone()]));

        b.source_account = "mallory".to_string();
        assert!(!validate_bridge_chain(&[a.clone(), b]));

        assert!(validate_bridge_chain(&[]));
        assert!(validate_bridge_chain(&[a]));
    }
}
