use uuid::Uuid;

use super::{fallback, parse_backup, Backend};
use crate::error::Result;
use crate::models::{Stock, StockDraft, StockPatch};
use crate::remote::Method;

pub(crate) const STOCKS_KEY: &str = "blueChipStocks";
const BACKUP_KEY: &str = "blueChipStocks_lastBackup";
const REQUIRED_FIELDS: &[&str] = &[
    "id",
    "code",
    "name",
    "buyPoint",
    "sellPoint",
    "shares",
    "currentPrice",
];

#[derive(Clone)]
pub(crate) struct StockStorage {
    backend: Backend,
}

impl StockStorage {
    pub(crate) fn new(backend: Backend) -> Self {
        Self { backend }
    }

    fn mirror(&self, stocks: Vec<Stock>) -> Result<Vec<Stock>> {
        self.backend.save(STOCKS_KEY, &stocks)?;
        Ok(stocks)
    }

    fn local(&self) -> Result<Vec<Stock>> {
        self.backend.load(STOCKS_KEY)
    }

    pub(crate) fn stocks(&self) -> Result<Vec<Stock>> {
        fallback(
            "getStocks",
            self.backend.fetch(Method::Get, "/stocks"),
            |stocks| self.mirror(stocks),
            || self.local(),
        )
    }

    /// The id and `addedAt` are assigned here, so both branches store the same entry.
    pub(crate) fn add(&self, draft: StockDraft) -> Result<Vec<Stock>> {
        let stock = Stock {
            id: Uuid::new_v4().to_string(),
            code: draft.code,
            name: draft.name,
            buy_point: draft.buy_point,
            sell_point: draft.sell_point,
            shares: draft.shares,
            current_price: draft.current_price,
            metrics: draft.metrics,
            added_at: Some(self.backend.now()),
        };

        fallback(
            "addStock",
            self.backend.send(Method::Post, "/stocks", &stock),
            |stocks| self.mirror(stocks),
            || {
                let mut stocks = self.local()?;
                stocks.push(stock.clone());
                self.mirror(stocks)
            },
        )
    }

    pub(crate) fn update(&self, id: &str, patch: &StockPatch) -> Result<Vec<Stock>> {
        fallback(
            "updateStock",
            self.backend
                .send(Method::Put, &format!("/stocks/{id}"), patch),
            |stocks| self.mirror(stocks),
            || {
                let mut stocks = self.local()?;
                for stock in stocks.iter_mut().filter(|s| s.id == id) {
                    stock.apply(patch);
                }
                self.mirror(stocks)
            },
        )
    }

    pub(crate) fn delete(&self, id: &str) -> Result<Vec<Stock>> {
        fallback(
            "deleteStock",
            self.backend.fetch(Method::Delete, &format!("/stocks/{id}")),
            |stocks| self.mirror(stocks),
            || {
                let mut stocks = self.local()?;
                stocks.retain(|s| s.id != id);
                self.mirror(stocks)
            },
        )
    }

    pub(crate) fn clear(&self) -> Result<Vec<Stock>> {
        let stocks = fallback(
            "clearStocks",
            self.backend.fetch(Method::Delete, "/stocks"),
            |stocks| self.mirror(stocks),
            || {
                self.backend.remove(STOCKS_KEY)?;
                Ok(Vec::new())
            },
        )?;
        self.backend.stamp_backup(BACKUP_KEY)?;
        Ok(stocks)
    }

    pub(crate) fn export_json(&self) -> Result<String> {
        let stocks = self.stocks()?;
        let text = serde_json::to_string_pretty(&stocks)?;
        self.backend.stamp_backup(BACKUP_KEY)?;
        tracing::info!(count = stocks.len(), "exported stocks");
        Ok(text)
    }

    /// Replace the watchlist with the stocks in `text`, ids kept as given.
    ///
    /// The remote copy is cleared and re-populated only when it accepts the clear.
    pub(crate) fn import_json(&self, text: &str) -> Result<Vec<Stock>> {
        let stocks: Vec<Stock> = parse_backup(text, "stock", REQUIRED_FIELDS)?;

        match self
            .backend
            .fetch::<serde_json::Value>(Method::Delete, "/stocks")
        {
            Ok(_) => {
                for stock in &stocks {
                    if let Err(e) = self
                        .backend
                        .send::<serde_json::Value, _>(Method::Post, "/stocks", stock)
                    {
                        tracing::warn!(code = %stock.code, error = %e, "remote stock import failed");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(op = "importStocks", error = %e, "remote call failed, using local store")
            }
        }

        self.backend.save(STOCKS_KEY, &stocks)?;
        self.backend.stamp_backup(BACKUP_KEY)?;
        tracing::info!(count = stocks.len(), "imported stocks");
        Ok(stocks)
    }

    pub(crate) fn backup_due(&self) -> Result<bool> {
        self.backend.backup_due(BACKUP_KEY)
    }
}
