use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A watchlist entry with trading thresholds and valuation figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Stock {
    pub id: String,
    pub code: String,
    pub name: String,
    pub buy_point: Decimal,
    pub sell_point: Decimal,
    pub shares: Decimal,
    pub current_price: Decimal,
    #[serde(flatten)]
    pub metrics: StockMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl Stock {
    pub fn market_value(&self) -> Decimal {
        self.shares * self.current_price
    }

    /// True when the price is at or under the buy threshold.
    pub fn in_buy_zone(&self) -> bool {
        self.current_price <= self.buy_point
    }

    pub fn in_sell_zone(&self) -> bool {
        self.current_price >= self.sell_point
    }

    pub fn apply(&mut self, patch: &StockPatch) {
        if let Some(code) = &patch.code {
            self.code = code.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(v) = patch.buy_point {
            self.buy_point = v;
        }
        if let Some(v) = patch.sell_point {
            self.sell_point = v;
        }
        if let Some(v) = patch.shares {
            self.shares = v;
        }
        if let Some(v) = patch.current_price {
            self.current_price = v;
        }
    }
}

/// Moving averages and valuation ratios, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma51: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma120: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma250: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma850: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pb: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_share_capital: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StockDraft {
    pub code: String,
    pub name: String,
    pub buy_point: Decimal,
    pub sell_point: Decimal,
    pub shares: Decimal,
    pub current_price: Decimal,
    pub metrics: StockMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_point: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_point: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
}
