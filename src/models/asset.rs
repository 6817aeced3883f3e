use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssetRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub live_money: Decimal,
    pub invest_money: Decimal,
    pub bond_money: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AssetRecord {
    pub fn total(&self) -> Decimal {
        self.total
            .unwrap_or(self.live_money + self.invest_money + self.bond_money)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssetDraft {
    pub live_money: Decimal,
    pub invest_money: Decimal,
    pub bond_money: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AssetDraft {
    pub fn into_record(self, id: i64, date: NaiveDate) -> AssetRecord {
        AssetRecord {
            id,
            date,
            live_money: self.live_money,
            invest_money: self.invest_money,
            bond_money: self.bond_money,
            total: self.total,
            note: self.note,
        }
    }
}
