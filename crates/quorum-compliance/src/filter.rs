//! Entry filtering: account globs, amount bounds, currency allow-lists,
//! and flag predicates.

use std::collections::BTreeSet;

use quorum_types::LedgerEntry;
use serde::{Deserialize, Serialize};

/// Criteria a ledger entry must satisfy to enter a report.
///
/// Empty collections impose no restriction: no patterns means every
/// account matches, an empty currency allow-list means every currency
/// passes, and empty flag sets skip their checks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Account-name globs; the entry must match ALL of them.
    pub account_patterns: Vec<String>,
    /// Inclusive lower bound in minor units.
    pub min_amount: Option<i64>,
    /// Inclusive upper bound in minor units.
    pub max_amount: Option<i64>,
    /// Non-empty restricts to these currencies.
    pub currencies: Vec<String>,
    /// Entries below this risk score are dropped.
    pub min_risk: Option<f64>,
    /// Non-empty requires at least one of these flags.
    pub include_flags: BTreeSet<String>,
    /// The entry must carry none of these flags.
    pub exclude_flags: BTreeSet<String>,
}

impl EntryFilter {
    /// Whether one entry satisfies every criterion.
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if !self
            .account_patterns
            .iter()
            .all(|p| glob_match(p, &entry.account))
        {
            return false;
        }
        if let Some(min) = self.min_amount {
            if entry.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if entry.amount > max {
                return false;
            }
        }
        if !self.currencies.is_empty() && !self.currencies.contains(&entry.currency) {
            return false;
        }
        if let Some(min_risk) = self.min_risk {
            if entry.risk_score < min_risk {
                return false;
            }
        }
        if !self.include_flags.is_empty() && self.include_flags.is_disjoint(&entry.flags) {
            return false;
        }
        if !self.exclude_flags.is_disjoint(&entry.flags) {
            return false;
        }
        true
    }
}

/// Apply a filter to a slice of entries, preserving input order.
pub fn filter_entries(entries: &[LedgerEntry], filter: &EntryFilter) -> Vec<LedgerEntry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Glob matching with `*` (any run, including empty) and `?` (exactly
/// one character). Iterative with single-star backtracking; linear in
/// practice, no pathological blowup.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p = pattern.as_bytes();
    let t = text.as_bytes();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == b'?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == b'*' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            // Backtrack: let the last star swallow one more character.
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}
