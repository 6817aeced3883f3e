use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Category, CategoryAmounts, Month};

/// One dated spending entry with an amount per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExpenseRecord {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub amounts: CategoryAmounts,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Input for creating or updating an expense record.
///
/// When `month` is given the record is dated on the last day of that month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExpenseDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    #[serde(flatten)]
    pub amounts: CategoryAmounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExpenseDraft {
    pub fn total_or_sum(&self) -> Decimal {
        self.total.unwrap_or_else(|| self.amounts.sum())
    }
}

/// Partial update of an expense record. Categories not listed keep their amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    #[serde(flatten)]
    pub amounts: BTreeMap<Category, Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.month.is_none()
            && self.amounts.is_empty()
            && self.total.is_none()
            && self.note.is_none()
    }

    /// Merge into `record`. The total is recomputed when amounts change and no
    /// explicit total is given. Dating from `month` is left to the caller.
    pub fn apply(&self, record: &mut ExpenseRecord) {
        for (category, amount) in &self.amounts {
            record.amounts.set(*category, *amount);
        }
        if let Some(total) = self.total {
            record.total = total;
        } else if !self.amounts.is_empty() {
            record.total = record.amounts.sum();
        }
        if let Some(note) = &self.note {
            record.note = Some(note.clone());
        }
    }
}

/// Per-year rollup of expense records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct YearSummary {
    pub total: Decimal,
    /// Keyed by two-digit month, `"01"`..`"12"`.
    pub monthly: BTreeMap<String, Decimal>,
    pub records: Vec<ExpenseRecord>,
}
