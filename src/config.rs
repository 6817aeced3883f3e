//! Runtime settings read from `POCKETLEDGER_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::Month;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:5001/api";
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_EPOCH: &str = "2025-12";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub api_url: String,
    /// Directory holding the local store. `None` uses the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub offline: bool,
    pub timeout: Duration,
    /// First month with a rollover predecessor.
    pub epoch: Month,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset and empty values take the defaults;
    /// anything else that fails to parse is an error.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("POCKETLEDGER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let data_dir = get("POCKETLEDGER_DATA_DIR").map(PathBuf::from);

        let offline = match get("POCKETLEDGER_OFFLINE") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| Error::Config(format!("POCKETLEDGER_OFFLINE='{raw}'")))?,
            None => false,
        };

        let timeout_ms = match get("POCKETLEDGER_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("POCKETLEDGER_TIMEOUT_MS='{raw}'")))?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let epoch_raw = get("POCKETLEDGER_EPOCH").unwrap_or_else(|| DEFAULT_EPOCH.into());
        let epoch = Month::parse(epoch_raw.trim())
            .map_err(|_| Error::Config(format!("POCKETLEDGER_EPOCH='{epoch_raw}'")))?;

        Ok(Self {
            api_url,
            data_dir,
            offline,
            timeout: Duration::from_millis(timeout_ms),
            epoch,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
