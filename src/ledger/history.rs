use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::validate_amount;
use crate::error::{Error, Result};
use crate::models::{
    next_id, BudgetHistoryRecord, BudgetTable, Category, ChangeType, HistoryUpdate, Month,
};

/// Apply a budget change and append its history entry.
///
/// Months before `current` get their own monthly entry; the current month and
/// later change the standing default.
pub(crate) fn apply_set(
    table: &mut BudgetTable,
    history: &mut Vec<BudgetHistoryRecord>,
    month: Month,
    category: Category,
    amount: Decimal,
    current: Month,
    now: DateTime<Utc>,
) -> Result<BudgetHistoryRecord> {
    let amount = validate_amount(amount)?;

    let (old_amount, change_type) = if month < current {
        let entry = table.month_entry(month, now);
        entry.updated_at = Some(now);
        (
            entry.set_category(category, amount),
            ChangeType::HistoricalBudgetChange,
        )
    } else {
        (
            table.default.set_category(category, amount),
            ChangeType::DefaultBudgetChange,
        )
    };

    let record = BudgetHistoryRecord {
        id: next_id(now, history.iter().map(|r| r.id)),
        month,
        category,
        old_amount,
        new_amount: amount,
        timestamp: now,
        change_type,
        updated_at: None,
    };
    history.push(record.clone());
    Ok(record)
}

/// Merge `update` into record `id` and re-apply its amount to the budget.
pub(crate) fn apply_edit(
    table: &mut BudgetTable,
    history: &mut [BudgetHistoryRecord],
    id: i64,
    update: &HistoryUpdate,
    now: DateTime<Utc>,
) -> Result<BudgetHistoryRecord> {
    if let Some(amount) = update.new_amount {
        validate_amount(amount)?;
    }
    let record = history
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::NotFound(format!("budget history record {id}")))?;

    update.apply(record);
    record.updated_at = Some(now);

    match record.change_type {
        ChangeType::HistoricalBudgetChange => {
            table
                .month_entry(record.month, now)
                .set_category(record.category, record.new_amount);
        }
        ChangeType::DefaultBudgetChange => {
            table
                .default
                .set_category(record.category, record.new_amount);
        }
    }
    Ok(record.clone())
}

/// Remove record `id` and restore its slot from the newest remaining record.
///
/// With nothing left, a monthly slot falls back to the nearest prior month's
/// amount (zero when there is none) and a default slot resets to zero.
pub(crate) fn apply_delete(
    table: &mut BudgetTable,
    history: &mut Vec<BudgetHistoryRecord>,
    id: i64,
) -> Result<BudgetHistoryRecord> {
    let index = history
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| Error::NotFound(format!("budget history record {id}")))?;
    let deleted = history.remove(index);

    // max_by_key keeps the last of equal timestamps, i.e. the later append.
    let newest = history
        .iter()
        .filter(|r| r.same_slot(&deleted))
        .max_by_key(|r| r.timestamp)
        .map(|r| r.new_amount);

    match deleted.change_type {
        ChangeType::HistoricalBudgetChange => {
            let restored = newest.unwrap_or_else(|| {
                table
                    .nearest_prior(deleted.month)
                    .map(|(_, prior)| prior.categories.get(deleted.category))
                    .unwrap_or(Decimal::ZERO)
            });
            match table.monthly.get_mut(&deleted.month) {
                Some(entry) => {
                    entry.set_category(deleted.category, restored);
                }
                None => tracing::debug!(
                    month = %deleted.month,
                    "no monthly entry to restore after history delete"
                ),
            }
        }
        ChangeType::DefaultBudgetChange => {
            table
                .default
                .set_category(deleted.category, newest.unwrap_or(Decimal::ZERO));
        }
    }
    Ok(deleted)
}
