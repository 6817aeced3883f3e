//! Budget ledger: month resolution, rollover and statistics.
//!
//! Everything here is pure over a [`BudgetTable`], the change log and the
//! expense records; [`crate::storage::BudgetStorage`] does the I/O.

mod history;
mod rollover;

pub(crate) use history::{apply_delete, apply_edit, apply_set};
pub(crate) use rollover::{calculate_roll, get_stats, BudgetStats, GroupFigures, RollSummary};

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{BudgetSet, BudgetTable, Category, Month};

/// Effective budget for `month`.
///
/// An explicit monthly entry wins. Otherwise the monthly entry closest in
/// calendar distance is used, the earlier one on a tie, and the default
/// budget when there are no monthly entries at all. Totals are always
/// recomputed from the category amounts.
pub(crate) fn resolve(table: &BudgetTable, month: Month) -> BudgetSet {
    let mut resolved = match table.monthly.get(&month) {
        Some(set) => set.clone(),
        None => {
            let mut closest: Option<(&Month, &BudgetSet)> = None;
            for (m, set) in &table.monthly {
                // Ascending iteration with a strict comparison keeps the earlier month on ties.
                if closest.map_or(true, |(best, _)| m.distance(&month) < best.distance(&month)) {
                    closest = Some((m, set));
                }
            }
            closest
                .map(|(_, set)| set.clone())
                .unwrap_or_else(|| table.default.clone())
        }
    };
    resolved.recompute();
    resolved
}

pub(crate) fn resolve_amount(table: &BudgetTable, month: Month, category: Category) -> Decimal {
    resolve(table, month).categories.get(category)
}

/// Parse a user-supplied amount, rejecting non-numeric and negative input.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|_| Error::InvalidAmount(raw.to_string()))?;
    validate_amount(amount)
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests;
