//! Fee and exposure arithmetic. Integer-only; no floating point touches
//! money.

use std::collections::BTreeMap;

use quorum_types::BridgeTransfer;

/// Minimum fee in minor units, charged regardless of amount.
pub const MIN_BRIDGE_FEE: i64 = 100;

/// Fee = max(floor(amount × basis_points / 10_000), [`MIN_BRIDGE_FEE`]).
///
/// The product is taken at i128 width so pathological amounts cannot
/// overflow before the division.
pub fn compute_bridge_fee(amount: i64, basis_points: i64) -> i64 {
    let raw = (amount as i128 * basis_points as i128) / 10_000;
    (raw as i64).max(MIN_BRIDGE_FEE)
}

/// Absolute net position per currency over the active transfers
/// (Locked or Confirmed). Transfers carry unsigned magnitudes, so the
/// net is the sum of active amounts per currency.
pub fn net_bridge_exposure(transfers: &[BridgeTransfer]) -> BTreeMap<String, i64> {
    let mut net: BTreeMap<String, i128> = BTreeMap::new();
    for transfer in transfers.iter().filter(|t| t.is_active()) {
        *net.entry(transfer.currency.clone()).or_default() += transfer.amount as i128;
    }
    net.into_iter()
        .map(|(currency, total)| (currency, total.unsigned_abs().min(i64::MAX as u128) as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use quorum_types::TransferStatus;

    use super::*;

    fn transfer(currency: &str, amount: i64, status: TransferStatus) -> BridgeTransfer {
        BridgeTransfer {
            id: "t".to_string(),
            source_ledger: "a".to_string(),
            target_ledger: "b".to_string(),
            source_account: "alice".to_string(),
            target_account: "bob".to_string(),
            amount,
            currency: currency.to_string(),
            initiated_at: 0,
            status,
            lock_id: None,
            confirmation_id: None,
            expires_at: None,
        }
    }

    #[test]
    fn minimum_fee_clamp() {
        assert_eq!(compute_bridge_fee(1, 50), 100);
        assert_eq!(compute_bridge_fee(0, 0), 100);
    }

    #[test]
    fn proportional_fee_above_the_clamp() {
        assert_eq!(compute_bridge_fee(2_000_000, 25), 5_000);
        assert_eq!(compute_bridge_fee(1_000_000, 100), 10_000);
    }

    #[test]
    fn fee_floors_toward_zero() {
        // 39_999 * 25 / 10_000 = 99.99..., floored below the clamp.
        assert_eq!(compute_bridge_fee(39_999, 25), 100);
        assert_eq!(compute_bridge_fee(40_400, 25), 101);
    }

    #[test]
    fn fee_is_monotone_in_amount() {
        let bps = 25;
        let amounts = [1, 100, 40_000, 41_000, 1_000_000, 2_000_000];
        let fees: Vec<i64> = amounts
            .iter()
            .map(|a| compute_bridge_fee(*a, bps))
            .collect();
        assert!(fees.windows(2).all(|w| w[0] <= w[1]));
        assert!(fees.iter().all(|f| *f >= MIN_BRIDGE_FEE));
    }

    #[test]
    fn exposure_counts_locked_and_confirmed_only() {
        let transfers = vec![
            transfer("USD", 10_000, TransferStatus::Locked),
            transfer("USD", 5_000, TransferStatus::Confirmed),
            transfer("USD", 99_999, TransferStatus::Settled),
            transfer("EUR", 7_500, TransferStatus::Locked),
            transfer("EUR", 1, TransferStatus::Pending),
        ];

        let exposure = net_bridge_exposure(&transfers);
        assert_eq!(exposure.get("USD"), Some(&15_000));
        assert_eq!(exposure.get("EUR"), Some(&7_500));
        assert_eq!(exposure.len(), 2);
    }
}
