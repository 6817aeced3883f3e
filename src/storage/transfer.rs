use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::asset::ASSETS_KEY;
use super::budget::{BUDGETS_KEY, HISTORY_KEY};
use super::expense::EXPENSES_KEY;
use super::{AssetStorage, Backend, BudgetStorage, ExpenseStorage};
use crate::error::{Error, Result};
use crate::models::{AssetRecord, BudgetHistoryRecord, BudgetTable, ExpenseRecord};

pub(crate) const EXPORT_VERSION: &str = "1.0";

/// Whole-ledger backup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub data: ExportData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportData {
    pub budgets: BudgetTable,
    #[serde(default)]
    pub budget_history: Vec<BudgetHistoryRecord>,
    pub expense_records: Vec<ExpenseRecord>,
    #[serde(default)]
    pub assets_data: Vec<AssetRecord>,
}

/// Export and import of the budget, expense and asset data as one document.
#[derive(Clone)]
pub(crate) struct Transfer {
    backend: Backend,
    budgets: BudgetStorage,
    expenses: ExpenseStorage,
    assets: AssetStorage,
}

impl Transfer {
    pub(crate) fn new(
        backend: Backend,
        budgets: BudgetStorage,
        expenses: ExpenseStorage,
        assets: AssetStorage,
    ) -> Self {
        Self {
            backend,
            budgets,
            expenses,
            assets,
        }
    }

    pub(crate) fn export(&self) -> Result<ExportDocument> {
        let data = ExportData {
            budgets: self.budgets.budgets()?,
            budget_history: self.budgets.history()?,
            expense_records: self.expenses.records()?,
            assets_data: self.assets.records()?,
        };
        tracing::info!(
            expenses = data.expense_records.len(),
            history = data.budget_history.len(),
            "exported ledger"
        );
        Ok(ExportDocument {
            version: EXPORT_VERSION.to_string(),
            export_date: self.backend.now(),
            data,
        })
    }

    /// Replace the local budget, history, expense and asset blobs from `text`.
    ///
    /// `data.budgets` and `data.expenseRecords` are required. Every section is
    /// decoded before the first write, so a rejected document changes nothing.
    /// An `assetsData` that is not an array leaves the stored assets alone.
    pub(crate) fn import(&self, text: &str) -> Result<ExportData> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| Error::InvalidFile(format!("not a JSON document: {e}")))?;
        let data = document
            .get("data")
            .ok_or_else(|| Error::InvalidFile("missing data".into()))?;

        let budgets: BudgetTable = required_section(data, "budgets")?;
        let expense_records: Vec<ExpenseRecord> = required_section(data, "expenseRecords")?;
        let budget_history: Vec<BudgetHistoryRecord> = match data.get("budgetHistory") {
            Some(Value::Null) | None => Vec::new(),
            Some(_) => required_section(data, "budgetHistory")?,
        };
        let assets_data: Option<Vec<AssetRecord>> = match data.get("assetsData") {
            Some(Value::Array(_)) => Some(required_section(data, "assetsData")?),
            _ => None,
        };

        let mut entries = vec![
            (BUDGETS_KEY, serde_json::to_value(&budgets)?),
            (HISTORY_KEY, serde_json::to_value(&budget_history)?),
            (EXPENSES_KEY, serde_json::to_value(&expense_records)?),
        ];
        if let Some(assets) = &assets_data {
            entries.push((ASSETS_KEY, serde_json::to_value(assets)?));
        }
        self.backend.save_all(&entries)?;
        tracing::info!(
            expenses = expense_records.len(),
            history = budget_history.len(),
            "imported ledger"
        );

        Ok(ExportData {
            budgets,
            budget_history,
            expense_records,
            assets_data: assets_data.unwrap_or_default(),
        })
    }

    pub(crate) fn export_to_file(&self, path: &Path) -> Result<ExportDocument> {
        let document = self.export()?;
        std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
        Ok(document)
    }

    pub(crate) fn import_from_file(&self, path: &Path) -> Result<ExportData> {
        let text = std::fs::read_to_string(path)?;
        self.import(&text)
    }
}

fn required_section<T: DeserializeOwned>(data: &Value, name: &str) -> Result<T> {
    let section = match data.get(name) {
        Some(Value::Null) | None => {
            return Err(Error::InvalidFile(format!("missing data.{name}")));
        }
        Some(section) => section.clone(),
    };
    serde_json::from_value(section).map_err(|e| Error::InvalidFile(format!("data.{name}: {e}")))
}
