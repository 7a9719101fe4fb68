//! Risk scoring and transaction flagging.
//!
//! Thresholds assume 2-decimal currencies (100 minor units per major
//! unit). The scoring coefficients are pinned by the test vectors below;
//! changing any of them is a reporting-format change.

use std::collections::BTreeSet;

use chrono::Duration;
use quorum_types::LedgerEntry;

/// Minor units per major unit for the supported 2-decimal currencies.
pub const MINOR_PER_MAJOR: i64 = 100;

/// $10,000 in minor units: the high-value and structuring threshold.
pub const HIGH_VALUE_MINOR: i64 = 10_000 * MINOR_PER_MAJOR;

/// Amounts in `[STRUCTURING_FLOOR_MINOR, HIGH_VALUE_MINOR)` sit just
/// below the reporting threshold.
pub const STRUCTURING_FLOOR_MINOR: i64 = HIGH_VALUE_MINOR / 10 * 9;

/// Round-number granularity: $1,000 in minor units.
pub const ROUND_AMOUNT_MINOR: i64 = 1_000 * MINOR_PER_MAJOR;

/// Accounts younger than this are flagged new.
pub const NEW_ACCOUNT_AGE_DAYS: i64 = 7;

pub const FLAG_HIGH_VALUE: &str = "high_value";
pub const FLAG_RAPID_MOVEMENT: &str = "rapid_movement";
pub const FLAG_NEW_ACCOUNT: &str = "new_account";
pub const FLAG_ROUND_AMOUNT: &str = "round_amount";
pub const FLAG_STRUCTURED: &str = "structured";
pub const FLAG_CROSS_BORDER: &str = "cross_border";

/// Count same-account entries in the window ending at the entry's
/// timestamp, the entry itself included, that satisfy `pred`. History
/// rows sharing the entry's transaction id are not double-counted.
fn same_account_within<F>(
    entry: &LedgerEntry,
    history: &[LedgerEntry],
    window: Duration,
    pred: F,
) -> usize
where
    F: Fn(&LedgerEntry) -> bool,
{
    let floor = entry.timestamp - window;
    let prior = history
        .iter()
        .filter(|h| h.account == entry.account)
        .filter(|h| h.transaction_id != entry.transaction_id)
        .filter(|h| h.timestamp > floor && h.timestamp <= entry.timestamp)
        .filter(|h| pred(h))
        .count();
    prior + usize::from(pred(entry))
}

/// Age of the entry's account: time since the earliest same-account
/// timestamp across history and the entry itself. An account with no
/// history is brand new.
fn account_age(entry: &LedgerEntry, history: &[LedgerEntry]) -> Duration {
    let earliest = history
        .iter()
        .filter(|h| h.account == entry.account)
        .map(|h| h.timestamp)
        .chain(std::iter::once(entry.timestamp))
        .min()
        .unwrap_or(entry.timestamp);
    entry.timestamp - earliest
}

/// Amount tier component of the risk score.
fn amount_tier(amount: i64) -> f64 {
    if amount < 1_000 * MINOR_PER_MAJOR {
        0.0
    } else if amount < HIGH_VALUE_MINOR {
        0.3
    } else if amount < 100_000 * MINOR_PER_MAJOR {
        0.6
    } else {
        1.0
    }
}

fn is_round_amount(amount: i64) -> bool {
    amount > 0 && amount % ROUND_AMOUNT_MINOR == 0
}

fn is_new_account(entry: &LedgerEntry, history: &[LedgerEntry]) -> bool {
    account_age(entry, history) < Duration::days(NEW_ACCOUNT_AGE_DAYS)
}

/// Weighted risk score in [0, 1].
///
/// `0.6 · amount_tier + 0.4 · velocity + pattern bonuses`, clamped. The
/// weighted components sum to 1.0; the round-amount (+0.1) and
/// new-account (+0.2) pattern factors are additive on top.
pub fn compute_risk_score(entry: &LedgerEntry, history: &[LedgerEntry]) -> f64 {
    let tier = amount_tier(entry.amount);
    let recent = same_account_within(entry, history, Duration::hours(1), |_| true);
    let velocity = (recent as f64 / 10.0).min(1.0);

    let mut bonus = 0.0;
    if is_round_amount(entry.amount) {
        bonus += 0.1;
    }
    if is_new_account(entry, history) {
        bonus += 0.2;
    }

    (0.6 * tier + 0.4 * velocity + bonus).clamp(0.0, 1.0)
}

/// Classify an entry against the closed flag vocabulary.
pub fn flag_transaction(entry: &LedgerEntry, history: &[LedgerEntry]) -> BTreeSet<String> {
    let mut flags = BTreeSet::new();

    if entry.amount >= HIGH_VALUE_MINOR {
        flags.insert(FLAG_HIGH_VALUE.to_string());
    }
    if same_account_within(entry, history, Duration::hours(1), |_| true) >= 3 {
        flags.insert(FLAG_RAPID_MOVEMENT.to_string());
    }
    if is_new_account(entry, history) {
        flags.insert(FLAG_NEW_ACCOUNT.to_string());
    }
    if is_round_amount(entry.amount) {
        flags.insert(FLAG_ROUND_AMOUNT.to_string());
    }
    let just_below = |e: &LedgerEntry| {
        e.amount >= STRUCTURING_FLOOR_MINOR && e.amount < HIGH_VALUE_MINOR
    };
    if same_account_within(entry, history, Duration::hours(24), just_below) >= 2 {
        flags.insert(FLAG_STRUCTURED.to_string());
    }
    if let (Some(source), Some(target)) = (&entry.source_country, &entry.target_country) {
        if source != target {
            flags.insert(FLAG_CROSS_BORDER.to_string());
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    fn entry(id: &str, account: &str, amount: i64, ts: DateTime<Utc>) -> LedgerEntry {
        LedgerEntry::new(id, account, amount, "USD", ts)
    }

    /// An old quiet account: a single prior entry well outside every
    /// window, so velocity and pattern factors stay silent.
    fn seasoned_history(account: &str) -> Vec<LedgerEntry> {
        vec![entry("tx-old", account, 1, at(1, 0, 0))]
    }

    #[test]
    fn tier_boundaries_are_pinned() {
        let history = seasoned_history("a");
        let score_at = |amount: i64| {
            let e = entry("tx-n", "a", amount, at(20, 12, 0));
            compute_risk_score(&e, &history)
        };
        // Only the entry itself in the trailing hour: velocity 0.1.
        let velocity_part = 0.4 * 0.1;
        assert!((score_at(99_999) - velocity_part).abs() < 1e-9);
        assert!((score_at(100_000) - (0.6 * 0.3 + velocity_part + 0.1)).abs() < 1e-9);
        assert!((score_at(999_999) - (0.6 * 0.3 + velocity_part)).abs() < 1e-9);
        assert!((score_at(1_000_000) - (0.6 * 0.6 + velocity_part + 0.1)).abs() < 1e-9);
        assert!((score_at(10_000_000) - (0.6 * 1.0 + velocity_part + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn score_clamps_at_one() {
        // Fresh account, huge round amount, a burst of activity.
        let ts = at(20, 12, 0);
        let mut history = Vec::new();
        for i in 0..12 {
            history.push(entry(
                &format!("tx-{i}"),
                "burst",
                500,
                ts - Duration::minutes(i),
            ));
        }
        let e = entry("tx-now", "burst", 10_000_000, ts);
        assert_eq!(compute_risk_score(&e, &history), 1.0);
    }

    #[test]
    fn score_never_goes_negative() {
        let e = entry("tx-1", "a", 0, at(20, 12, 0));
        let score = compute_risk_score(&e, &seasoned_history("a"));
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn high_value_and_round_amount_fire_on_amounts_alone() {
        let history = seasoned_history("a");
        let e = entry("tx-1", "a", 1_000_000, at(20, 12, 0));
        let flags = flag_transaction(&e, &history);
        assert!(flags.contains(FLAG_HIGH_VALUE));
        assert!(flags.contains(FLAG_ROUND_AMOUNT));
        assert!(!flags.contains(FLAG_STRUCTURED));
    }

    #[test]
    fn structuring_scenario_just_below_threshold() {
        // 9,900 USD with two prior just-below-threshold entries in the
        // trailing 24h: structured, not high_value, and rapid_movement
        // only if three land inside one hour.
        let ts = at(20, 12, 0);
        let history = vec![
            entry("tx-h1", "a", 980_000, ts - Duration::hours(2)),
            entry("tx-h2", "a", 955_000, ts - Duration::hours(20)),
        ];
        let e = entry("tx-now", "a", 990_000, ts);

        let flags = flag_transaction(&e, &history);
        assert!(flags.contains(FLAG_STRUCTURED));
        assert!(!flags.contains(FLAG_HIGH_VALUE));
        assert!(!flags.contains(FLAG_RAPID_MOVEMENT));
    }

    #[test]
    fn rapid_movement_needs_three_in_the_hour() {
        let ts = at(20, 12, 0);
        let mut history = vec![
            entry("tx-h1", "a", 100, ts - Duration::minutes(10)),
        ];
        let e = entry("tx-now", "a", 100, ts);
        assert!(!flag_transaction(&e, &history).contains(FLAG_RAPID_MOVEMENT));

        history.push(entry("tx-h2", "a", 100, ts - Duration::minutes(30)));
        assert!(flag_transaction(&e, &history).contains(FLAG_RAPID_MOVEMENT));
    }

    #[test]
    fn new_account_flag_follows_account_age() {
        let ts = at(20, 12, 0);
        let fresh = entry("tx-1", "a", 100, ts);
        assert!(flag_transaction(&fresh, &[]).contains(FLAG_NEW_ACCOUNT));

        let aged = flag_transaction(&fresh, &seasoned_history("a"));
        assert!(!aged.contains(FLAG_NEW_ACCOUNT));
    }

    #[test]
    fn cross_border_requires_differing_countries() {
        let ts = at(20, 12, 0);
        let mut e = entry("tx-1", "a", 100, ts);
        assert!(!flag_transaction(&e, &[]).contains(FLAG_CROSS_BORDER));

        e.source_country = Some("US".to_string());
        e.target_country = Some("US".to_string());
        assert!(!flag_transaction(&e, &[]).contains(FLAG_CROSS_BORDER));

        e.target_country = Some("DE".to_string());
        assert!(flag_transaction(&e, &[]).contains(FLAG_CROSS_BORDER));
    }

    #[test]
    fn windows_exclude_entries_outside_their_span() {
        let ts = at(20, 12, 0);
        // Two in-band entries, but 25 hours back: no structuring.
        let history = vec![
            entry("tx-h1", "a", 950_000, ts - Duration::hours(25)),
            entry("tx-h2", "a", 960_000, ts - Duration::hours(26)),
        ];
        let e = entry("tx-now", "a", 990_000, ts);
        assert!(!flag_transaction(&e, &history).contains(FLAG_STRUCTURED));
    }
}
