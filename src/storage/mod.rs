//! Storage wrappers: each call tries the remote API first and, when that
//! fails, runs the same operation against the local key-value mirror.

mod asset;
mod budget;
mod expense;
mod reading;
mod stock;
mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use asset::AssetStorage;
pub(crate) use budget::BudgetStorage;
pub(crate) use expense::{ExpenseLedger, ExpenseStorage};
pub(crate) use reading::ReadingList;
pub(crate) use stock::StockStorage;
pub(crate) use transfer::Transfer;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

use crate::error::{Error, RemoteError, Result};
use crate::remote::{Method, RemoteApi};

/// Whole-blob key-value persistence. Writes always replace the full value.
pub(crate) trait LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Write every entry or none of them.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub(crate) trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// The ports every wrapper is built on, shared for one session.
#[derive(Clone)]
pub(crate) struct Backend {
    remote: Rc<dyn RemoteApi>,
    local: Rc<dyn LocalStore>,
    clock: Rc<dyn Clock>,
}

impl Backend {
    pub(crate) fn new(
        remote: Rc<dyn RemoteApi>,
        local: Rc<dyn LocalStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            remote,
            local,
            clock,
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Remote call without a body, decoding the response into `T`.
    pub(crate) fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
    ) -> std::result::Result<T, RemoteError> {
        let value = self.remote.request(method, endpoint, None)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Remote call with a JSON body, decoding the response into `T`.
    pub(crate) fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> std::result::Result<T, RemoteError> {
        let body = serde_json::to_value(body)?;
        let value = self.remote.request(method, endpoint, Some(&body))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read a JSON blob. A missing blob reads as `T::default()`; a malformed
    /// one is an error so read-modify-write callers never overwrite it.
    pub(crate) fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(raw) = self.local.get(key)? else {
            return Ok(T::default());
        };
        serde_json::from_str(&raw).map_err(|source| {
            tracing::error!(key, error = %source, "local blob is malformed");
            Error::Corrupt {
                key: key.to_string(),
                source,
            }
        })
    }

    /// Like [`Backend::load`], but a malformed blob reads as `T::default()`.
    pub(crate) fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.load(key) {
            Err(Error::Corrupt { .. }) => Ok(T::default()),
            other => other,
        }
    }

    pub(crate) fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        tracing::debug!(key, bytes = raw.len(), "local write");
        self.local.set(key, &raw)
    }

    /// Encode and write several blobs in one all-or-nothing step.
    pub(crate) fn save_all(&self, entries: &[(&str, Value)]) -> Result<()> {
        let mut encoded = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            encoded.push((*key, serde_json::to_string(value)?));
        }
        tracing::debug!(keys = encoded.len(), "local batch write");
        self.local.set_many(&encoded)
    }

    pub(crate) fn load_raw(&self, key: &str) -> Result<Option<String>> {
        self.local.get(key)
    }

    pub(crate) fn save_raw(&self, key: &str, value: &str) -> Result<()> {
        self.local.set(key, value)
    }

    pub(crate) fn remove(&self, key: &str) -> Result<()> {
        self.local.remove(key)
    }

    /// Whether the backup stamp under `key` is missing or older than seven days.
    pub(crate) fn backup_due(&self, key: &str) -> Result<bool> {
        let last = self
            .load_raw(key)?
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        Ok(match last {
            Some(ms) => self.now().timestamp_millis() - ms > BACKUP_INTERVAL_MS,
            None => true,
        })
    }

    pub(crate) fn stamp_backup(&self, key: &str) -> Result<()> {
        self.save_raw(key, &self.now().timestamp_millis().to_string())
    }
}

const BACKUP_INTERVAL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Parse a backup file: a JSON array whose every element carries `required`.
///
/// Nothing is decoded into `T` until every element has passed the field check.
pub(crate) fn parse_backup<T: DeserializeOwned>(
    text: &str,
    what: &str,
    required: &[&str],
) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidFile(format!("{what}: {e}")))?;
    let Value::Array(items) = value else {
        return Err(Error::InvalidFile(format!("{what}: expected a JSON array")));
    };

    for (index, item) in items.iter().enumerate() {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|field| item.get(*field).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::InvalidFile(format!(
                "{what} #{} is missing {}",
                index + 1,
                missing.join(", ")
            )));
        }
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::InvalidFile(format!("{what} #{}: {e}", index + 1)))
        })
        .collect()
}

/// Two-tier strategy: use the remote result when it succeeded, otherwise log
/// the failure and run the local branch. Domain errors from either branch
/// propagate; remote errors never do.
pub(crate) fn fallback<R, T>(
    op: &str,
    remote: std::result::Result<R, RemoteError>,
    on_remote: impl FnOnce(R) -> Result<T>,
    local: impl FnOnce() -> Result<T>,
) -> Result<T> {
    match remote {
        Ok(value) => on_remote(value),
        Err(e) => {
            tracing::warn!(op, error = %e, "remote call failed, using local store");
            local()
        }
    }
}
