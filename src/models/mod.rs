mod asset;
mod budget;
mod category;
mod expense;
mod history;
mod month;
mod reading;
mod stock;

pub(crate) use asset::{AssetDraft, AssetRecord};
pub(crate) use budget::{BudgetSet, BudgetTable, CategoryAmounts};
pub(crate) use category::{Category, Group};
pub(crate) use expense::{ExpenseDraft, ExpensePatch, ExpenseRecord, YearSummary};
pub(crate) use history::{next_id, BudgetHistoryRecord, ChangeType, HistoryUpdate};
pub(crate) use month::Month;
pub(crate) use reading::{Blog, BlogDraft, Note, NoteDraft, ReadingEntry, ReadingMetadata};
pub(crate) use stock::{Stock, StockDraft, StockPatch};
