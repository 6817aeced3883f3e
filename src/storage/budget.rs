use rust_decimal::Decimal;
use serde::Serialize;
use std::rc::Rc;

use super::{fallback, Backend, ExpenseLedger};
use crate::error::Result;
use crate::ledger::{self, validate_amount, BudgetStats, RollSummary};
use crate::models::{BudgetHistoryRecord, BudgetSet, BudgetTable, Category, HistoryUpdate, Month};
use crate::remote::Method;

pub(crate) const BUDGETS_KEY: &str = "budget_settings";
pub(crate) const HISTORY_KEY: &str = "budget_history";

#[derive(Serialize)]
struct SetBudgetRequest {
    month: Month,
    category: Category,
    amount: Decimal,
}

/// Budget table, change log and the rollover views over them.
#[derive(Clone)]
pub(crate) struct BudgetStorage {
    backend: Backend,
    expenses: Rc<dyn ExpenseLedger>,
    epoch: Month,
}

impl BudgetStorage {
    pub(crate) fn new(backend: Backend, expenses: Rc<dyn ExpenseLedger>, epoch: Month) -> Self {
        Self {
            backend,
            expenses,
            epoch,
        }
    }

    pub(crate) fn epoch(&self) -> Month {
        self.epoch
    }

    fn local_table(&self) -> Result<BudgetTable> {
        self.backend.load_or_default(BUDGETS_KEY)
    }

    fn local_history(&self) -> Result<Vec<BudgetHistoryRecord>> {
        self.backend.load(HISTORY_KEY)
    }

    fn store(&self, table: &BudgetTable, history: &[BudgetHistoryRecord]) -> Result<()> {
        self.backend.save(BUDGETS_KEY, table)?;
        self.backend.save(HISTORY_KEY, history)
    }

    pub(crate) fn budgets(&self) -> Result<BudgetTable> {
        fallback(
            "getBudgets",
            self.backend.fetch(Method::Get, "/budgets"),
            |table: BudgetTable| {
                self.backend.save(BUDGETS_KEY, &table)?;
                Ok(table)
            },
            || self.local_table(),
        )
    }

    pub(crate) fn history(&self) -> Result<Vec<BudgetHistoryRecord>> {
        fallback(
            "getBudgetHistory",
            self.backend.fetch(Method::Get, "/budgets/history"),
            |history: Vec<BudgetHistoryRecord>| {
                self.backend.save(HISTORY_KEY, &history)?;
                Ok(history)
            },
            || self.local_history(),
        )
    }

    pub(crate) fn history_by_month(&self, month: &str) -> Result<Vec<BudgetHistoryRecord>> {
        let month = Month::parse(month)?;
        let mut history = self.history()?;
        history.retain(|r| r.month == month);
        Ok(history)
    }

    pub(crate) fn resolve(&self, month: &str) -> Result<BudgetSet> {
        let month = Month::parse(month)?;
        Ok(ledger::resolve(&self.budgets()?, month))
    }

    pub(crate) fn resolve_amount(&self, month: &str, category: Category) -> Result<Decimal> {
        let month = Month::parse(month)?;
        Ok(ledger::resolve_amount(&self.budgets()?, month, category))
    }

    /// Set one category for `month`. Past months get their own entry, the
    /// current month and later change the default.
    pub(crate) fn set_budget(
        &self,
        month: &str,
        category: Category,
        amount: Decimal,
    ) -> Result<BudgetTable> {
        let month = Month::parse(month)?;
        let amount = validate_amount(amount)?;
        let request = SetBudgetRequest {
            month,
            category,
            amount,
        };

        fallback(
            "setMonthlyBudget",
            self.backend.send(Method::Post, "/budgets", &request),
            |table: BudgetTable| {
                self.backend.save(BUDGETS_KEY, &table)?;
                self.history()?;
                Ok(table)
            },
            || {
                let mut table = self.local_table()?;
                let mut history = self.local_history()?;
                ledger::apply_set(
                    &mut table,
                    &mut history,
                    month,
                    category,
                    amount,
                    Month::of(self.backend.today()),
                    self.backend.now(),
                )?;
                self.store(&table, &history)?;
                Ok(table)
            },
        )
    }

    pub(crate) fn update_history_record(
        &self,
        id: i64,
        update: &HistoryUpdate,
    ) -> Result<BudgetHistoryRecord> {
        if let Some(amount) = update.new_amount {
            validate_amount(amount)?;
        }

        fallback(
            "updateBudgetHistoryRecord",
            self.backend
                .send(Method::Put, &format!("/budgets/history/{id}"), update),
            |record: BudgetHistoryRecord| {
                self.history()?;
                self.budgets()?;
                Ok(record)
            },
            || {
                let mut table = self.local_table()?;
                let mut history = self.local_history()?;
                let record =
                    ledger::apply_edit(&mut table, &mut history, id, update, self.backend.now())?;
                self.store(&table, &history)?;
                Ok(record)
            },
        )
    }

    pub(crate) fn delete_history_record(&self, id: i64) -> Result<BudgetHistoryRecord> {
        fallback(
            "deleteBudgetHistoryRecord",
            self.backend
                .fetch(Method::Delete, &format!("/budgets/history/{id}")),
            |record: BudgetHistoryRecord| {
                self.history()?;
                self.budgets()?;
                Ok(record)
            },
            || {
                let mut table = self.local_table()?;
                let mut history = self.local_history()?;
                let record = ledger::apply_delete(&mut table, &mut history, id)?;
                self.store(&table, &history)?;
                Ok(record)
            },
        )
    }

    pub(crate) fn calculate_roll(&self, month: &str) -> Result<RollSummary> {
        let month = Month::parse(month)?;
        let table = self.budgets()?;
        let expenses = self.expenses.expense_records()?;
        Ok(ledger::calculate_roll(&table, &expenses, month, self.epoch))
    }

    pub(crate) fn get_stats(&self, month: &str) -> Result<BudgetStats> {
        let month = Month::parse(month)?;
        let table = self.budgets()?;
        let expenses = self.expenses.expense_records()?;
        Ok(ledger::get_stats(&table, &expenses, month, self.epoch))
    }

    /// Local keys are removed whether or not the remote accepted the delete.
    pub(crate) fn clear_all(&self) -> Result<()> {
        if let Err(e) = self
            .backend
            .fetch::<serde_json::Value>(Method::Delete, "/budgets")
        {
            tracing::warn!(op = "clearBudgets", error = %e, "remote call failed, using local store");
        }
        self.backend.remove(BUDGETS_KEY)?;
        self.backend.remove(HISTORY_KEY)
    }
}
