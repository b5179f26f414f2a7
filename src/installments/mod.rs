//! Installment detection and projection.
//!
//! Installment groups are derived, never stored: each call re-scans every
//! statement for descriptions carrying an `N/M` (or "parcela N de M")
//! marker, groups sightings by the description with the marker stripped,
//! and projects the unseen indices forward by month arithmetic.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use crate::ledger::Statement;
use crate::utils::normalize_description;

/// Sane bounds for a total installment count; anything outside is treated as
/// a false positive (dates, order numbers, fractions in merchant names).
const MIN_TOTAL: u32 = 2;
const MAX_TOTAL: u32 = 60;

/// Merchants whose names contain digit pairs that look like installment
/// markers, plus anticipated-installment lines which reuse the marker.
const DENYLIST: &[&str] = &["99app", "99 app", "antecipada"];

static INSTALLMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:parcela\s+)?(\d{1,2})\s*(?:/|de\s)\s*(\d{1,2})").expect("installment pattern")
});

/// A purchase inferred from installment markers across statements.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentGroup {
    /// Normalized description with the installment marker stripped.
    pub description: String,
    pub installment_amount: f64,
    pub total_installments: u32,
    /// Installment indices already sighted in some statement.
    pub seen: BTreeSet<u32>,
    /// `(year, month)` of the earliest sighting for this group.
    pub first_seen: (i32, u32),
}

/// One projected future installment, bucketed by calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentOccurrence {
    pub description: String,
    pub amount: f64,
    pub number: u32,
    pub total_installments: u32,
}

/// Scans all statements and groups installment sightings.
///
/// Duplicate sightings of the same index are idempotent; the chronologically
/// earliest sighting fixes the per-installment amount, the total, and the
/// group's first-seen month, regardless of statement iteration order.
pub fn detect_groups(statements: &[Statement]) -> Vec<InstallmentGroup> {
    let mut groups: BTreeMap<String, InstallmentGroup> = BTreeMap::new();

    for statement in statements {
        for transaction in &statement.transactions {
            let normalized = normalize_description(&transaction.description);
            if DENYLIST.iter().any(|term| normalized.contains(term)) {
                continue;
            }
            let Some(captures) = INSTALLMENT_RE.captures(&normalized) else {
                continue;
            };
            let current: u32 = captures[1].parse().unwrap_or(0);
            let total: u32 = captures[2].parse().unwrap_or(0);
            if current < 1 || current > total || !(MIN_TOTAL..=MAX_TOTAL).contains(&total) {
                continue;
            }

            let base = INSTALLMENT_RE.replace_all(&normalized, "").trim().to_string();
            let sighting = (statement.year, statement.month);
            groups
                .entry(base.clone())
                .and_modify(|group| {
                    group.seen.insert(current);
                    if sighting < group.first_seen {
                        group.first_seen = sighting;
                        group.installment_amount = transaction.amount;
                        group.total_installments = total;
                    }
                })
                .or_insert_with(|| InstallmentGroup {
                    description: base,
                    installment_amount: transaction.amount,
                    total_installments: total,
                    seen: BTreeSet::from([current]),
                    first_seen: sighting,
                });
        }
    }

    groups.into_values().collect()
}

/// Projects every unseen installment index on/after the as-of month.
///
/// Installment `n` of a group is placed at `first_seen + (n - 1)` months.
/// Recomputed from raw statement history on every call.
pub fn project_future(
    statements: &[Statement],
    as_of_month: u32,
    as_of_year: i32,
) -> BTreeMap<(i32, u32), Vec<InstallmentOccurrence>> {
    let mut future: BTreeMap<(i32, u32), Vec<InstallmentOccurrence>> = BTreeMap::new();

    for group in detect_groups(statements) {
        let (first_year, first_month) = group.first_seen;
        for number in 1..=group.total_installments {
            if group.seen.contains(&number) {
                continue;
            }
            let position = add_months(first_year, first_month, number - 1);
            if position >= (as_of_year, as_of_month) {
                future
                    .entry(position)
                    .or_default()
                    .push(InstallmentOccurrence {
                        description: group.description.clone(),
                        amount: group.installment_amount,
                        number,
                        total_installments: group.total_installments,
                    });
            }
        }
    }

    future
}

/// Steps a `(year, month)` pair forward by whole months.
pub fn add_months(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let zero_based = month as i64 - 1 + offset as i64;
    (
        year + (zero_based / 12) as i32,
        (zero_based % 12) as u32 + 1,
    )
}
