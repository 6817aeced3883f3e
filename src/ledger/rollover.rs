use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::resolve;
use crate::models::{BudgetSet, BudgetTable, Category, CategoryAmounts, ExpenseRecord, Group, Month};

/// One figure per group plus the grand total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct GroupFigures {
    pub necessary: Decimal,
    pub discretionary: Decimal,
    pub total: Decimal,
}

impl GroupFigures {
    pub fn of_budget(set: &BudgetSet) -> Self {
        Self {
            necessary: set.necessary.total,
            discretionary: set.discretionary.total,
            total: set.total,
        }
    }

    pub fn get(&self, group: Group) -> Decimal {
        match group {
            Group::Necessary => self.necessary,
            Group::Discretionary => self.discretionary,
        }
    }

    fn zip(a: Self, b: Self, f: impl Fn(Decimal, Decimal) -> Decimal) -> Self {
        Self {
            necessary: f(a.necessary, b.necessary),
            discretionary: f(a.discretionary, b.discretionary),
            total: f(a.total, b.total),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RollSummary {
    pub carried_forward: GroupFigures,
    pub deficit: GroupFigures,
    pub current_budget: GroupFigures,
    pub available_budget: GroupFigures,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct LineStats {
    pub budget: Decimal,
    pub actual: Decimal,
    pub remaining: Decimal,
}

impl LineStats {
    fn new(budget: Decimal, actual: Decimal) -> Self {
        Self {
            budget,
            actual,
            remaining: budget - actual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BudgetStats {
    pub categories: BTreeMap<Category, LineStats>,
    pub necessary: LineStats,
    pub discretionary: LineStats,
    pub total: LineStats,
    pub available_budget: GroupFigures,
}

pub(crate) fn actual_by_category(expenses: &[ExpenseRecord], month: Month) -> CategoryAmounts {
    let mut actual = CategoryAmounts::default();
    for record in expenses.iter().filter(|r| month.contains(r.date)) {
        for (category, amount) in record.amounts.iter() {
            actual.add(category, amount);
        }
    }
    actual
}

pub(crate) fn actual_by_group(expenses: &[ExpenseRecord], month: Month) -> GroupFigures {
    let actual = actual_by_category(expenses, month);
    let necessary = actual.group_sum(Group::Necessary);
    let discretionary = actual.group_sum(Group::Discretionary);
    GroupFigures {
        necessary,
        discretionary,
        total: necessary + discretionary,
    }
}

/// Carry-forward and deficit from the previous month only.
///
/// Months whose predecessor falls before `epoch` have no rollover.
pub(crate) fn calculate_roll(
    table: &BudgetTable,
    expenses: &[ExpenseRecord],
    month: Month,
    epoch: Month,
) -> RollSummary {
    let current_budget = GroupFigures::of_budget(&resolve(table, month));
    let prev = month.prev();
    if prev < epoch {
        return RollSummary {
            current_budget,
            available_budget: current_budget,
            ..Default::default()
        };
    }

    let prev_budget = GroupFigures::of_budget(&resolve(table, prev));
    let prev_actual = actual_by_group(expenses, prev);

    let carried_forward =
        GroupFigures::zip(prev_budget, prev_actual, |b, a| (b - a).max(Decimal::ZERO));
    let deficit = GroupFigures::zip(prev_actual, prev_budget, |a, b| (a - b).max(Decimal::ZERO));
    let available_budget = GroupFigures::zip(
        GroupFigures::zip(current_budget, carried_forward, |c, f| c + f),
        deficit,
        |sum, d| (sum - d).max(Decimal::ZERO),
    );

    RollSummary {
        carried_forward,
        deficit,
        current_budget,
        available_budget,
    }
}

pub(crate) fn get_stats(
    table: &BudgetTable,
    expenses: &[ExpenseRecord],
    month: Month,
    epoch: Month,
) -> BudgetStats {
    let budget = resolve(table, month);
    let actual = actual_by_category(expenses, month);

    let categories = Category::all()
        .iter()
        .map(|c| (*c, LineStats::new(budget.categories.get(*c), actual.get(*c))))
        .collect();

    let necessary = LineStats::new(budget.necessary.total, actual.group_sum(Group::Necessary));
    let discretionary = LineStats::new(
        budget.discretionary.total,
        actual.group_sum(Group::Discretionary),
    );
    let total = LineStats::new(budget.total, necessary.actual + discretionary.actual);

    BudgetStats {
        categories,
        necessary,
        discretionary,
        total,
        available_budget: calculate_roll(table, expenses, month, epoch).available_budget,
    }
}
