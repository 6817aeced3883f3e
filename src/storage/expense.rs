use chrono::Datelike;
use std::collections::BTreeMap;

use super::{fallback, Backend};
use crate::error::{Error, Result};
use crate::models::{next_id, ExpenseDraft, ExpensePatch, ExpenseRecord, Month, YearSummary};
use crate::remote::Method;

pub(crate) const EXPENSES_KEY: &str = "expense_records";

/// Read-only view of the expense records the budget ledger aggregates.
pub(crate) trait ExpenseLedger {
    fn expense_records(&self) -> Result<Vec<ExpenseRecord>>;
}

#[derive(Clone)]
pub(crate) struct ExpenseStorage {
    backend: Backend,
}

impl ExpenseStorage {
    pub(crate) fn new(backend: Backend) -> Self {
        Self { backend }
    }

    fn mirror(&self, records: Vec<ExpenseRecord>) -> Result<Vec<ExpenseRecord>> {
        self.backend.save(EXPENSES_KEY, &records)?;
        Ok(records)
    }

    fn local(&self) -> Result<Vec<ExpenseRecord>> {
        self.backend.load(EXPENSES_KEY)
    }

    pub(crate) fn records(&self) -> Result<Vec<ExpenseRecord>> {
        fallback(
            "getExpenses",
            self.backend.fetch(Method::Get, "/expenses"),
            |records| self.mirror(records),
            || self.local(),
        )
    }

    /// Dated on the last day of `month` when given, otherwise today.
    fn date_for(&self, month: Option<Month>) -> Result<chrono::NaiveDate> {
        match month {
            Some(month) => month
                .last_day()
                .ok_or_else(|| Error::InvalidFormat(month.to_string())),
            None => Ok(self.backend.today()),
        }
    }

    pub(crate) fn add(&self, draft: &ExpenseDraft) -> Result<Vec<ExpenseRecord>> {
        fallback(
            "addExpense",
            self.backend.send(Method::Post, "/expenses", draft),
            |records| self.mirror(records),
            || {
                let mut records = self.local()?;
                let record = ExpenseRecord {
                    id: next_id(self.backend.now(), records.iter().map(|r| r.id)),
                    date: self.date_for(draft.month)?,
                    amounts: draft.amounts.clone(),
                    total: draft.total_or_sum(),
                    note: draft.note.clone(),
                };
                records.push(record);
                records.sort_by_key(|r| r.date);
                self.mirror(records)
            },
        )
    }

    /// Merge `patch` into record `id`. An absent id leaves the list as is.
    pub(crate) fn update(&self, id: i64, patch: &ExpensePatch) -> Result<Vec<ExpenseRecord>> {
        fallback(
            "updateExpense",
            self.backend
                .send(Method::Put, &format!("/expenses/{id}"), patch),
            |records| self.mirror(records),
            || {
                let mut records = self.local()?;
                let Some(record) = records.iter_mut().find(|r| r.id == id) else {
                    return Ok(records);
                };
                if patch.month.is_some() {
                    record.date = self.date_for(patch.month)?;
                }
                patch.apply(record);
                records.sort_by_key(|r| r.date);
                self.mirror(records)
            },
        )
    }

    pub(crate) fn delete(&self, id: i64) -> Result<Vec<ExpenseRecord>> {
        fallback(
            "deleteExpense",
            self.backend.fetch(Method::Delete, &format!("/expenses/{id}")),
            |records| self.mirror(records),
            || {
                let mut records = self.local()?;
                records.retain(|r| r.id != id);
                self.mirror(records)
            },
        )
    }

    pub(crate) fn clear(&self) -> Result<()> {
        fallback(
            "clearExpenses",
            self.backend
                .fetch::<serde_json::Value>(Method::Delete, "/expenses"),
            |_| self.backend.remove(EXPENSES_KEY),
            || self.backend.remove(EXPENSES_KEY),
        )
    }

    pub(crate) fn latest(&self) -> Result<Option<ExpenseRecord>> {
        fallback(
            "getLatestExpense",
            self.backend.fetch(Method::Get, "/expenses/latest"),
            Ok,
            || Ok(self.local()?.into_iter().max_by_key(|r| r.date)),
        )
    }

    pub(crate) fn grouped_by_year(&self) -> Result<BTreeMap<i32, YearSummary>> {
        let mut records = self.records()?;
        records.sort_by_key(|r| r.date);

        let mut grouped: BTreeMap<i32, YearSummary> = BTreeMap::new();
        for record in records {
            let year = grouped.entry(record.date.year()).or_default();
            year.total += record.total;
            *year
                .monthly
                .entry(format!("{:02}", record.date.month()))
                .or_default() += record.total;
            year.records.push(record);
        }
        Ok(grouped)
    }
}

impl ExpenseLedger for ExpenseStorage {
    fn expense_records(&self) -> Result<Vec<ExpenseRecord>> {
        self.records()
    }
}
