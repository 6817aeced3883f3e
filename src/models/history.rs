use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, Month};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ChangeType {
    DefaultBudgetChange,
    HistoricalBudgetChange,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultBudgetChange => "default_budget_change",
            Self::HistoricalBudgetChange => "historical_budget_change",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit-log entry for one budget change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BudgetHistoryRecord {
    pub id: i64,
    pub month: Month,
    pub category: Category,
    pub old_amount: Decimal,
    pub new_amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetHistoryRecord {
    /// Whether `other` tracks the same budget slot as `self`.
    pub fn same_slot(&self, other: &BudgetHistoryRecord) -> bool {
        if self.change_type != other.change_type || self.category != other.category {
            return false;
        }
        match self.change_type {
            ChangeType::DefaultBudgetChange => true,
            ChangeType::HistoricalBudgetChange => self.month == other.month,
        }
    }
}

/// Partial update merged into a history record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_amount: Option<Decimal>,
}

impl HistoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.month.is_none()
            && self.category.is_none()
            && self.old_amount.is_none()
            && self.new_amount.is_none()
    }

    pub fn apply(&self, record: &mut BudgetHistoryRecord) {
        if let Some(month) = self.month {
            record.month = month;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(old) = self.old_amount {
            record.old_amount = old;
        }
        if let Some(new) = self.new_amount {
            record.new_amount = new;
        }
    }
}

/// Millisecond id unique within `existing`.
pub(crate) fn next_id(now: DateTime<Utc>, existing: impl Iterator<Item = i64>) -> i64 {
    let max = existing.max().unwrap_or(i64::MIN);
    now.timestamp_millis().max(max.saturating_add(1))
}
