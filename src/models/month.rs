use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// A calendar month, written `YYYY-MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Month {
    year: i32,
    month: u32,
}

fn month_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").ok())
        .as_ref()
}

impl Month {
    pub(crate) fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidFormat(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub(crate) fn parse(s: &str) -> Result<Self> {
        if !month_pattern().is_some_and(|re| re.is_match(s)) {
            return Err(Error::InvalidFormat(s.to_string()));
        }
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidFormat(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| Error::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| Error::InvalidFormat(s.to_string()))?;
        Self::new(year, month).map_err(|_| Error::InvalidFormat(s.to_string()))
    }

    pub(crate) fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> u32 {
        self.month
    }

    /// Months since year 0, used for distance and stepping.
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        let year = ordinal.div_euclid(12) as i32;
        let month = ordinal.rem_euclid(12) as u32 + 1;
        Self { year, month }
    }

    pub(crate) fn prev(&self) -> Self {
        Self::from_ordinal(self.ordinal() - 1)
    }

    pub(crate) fn next(&self) -> Self {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Absolute distance in calendar months.
    pub(crate) fn distance(&self, other: &Month) -> u64 {
        self.ordinal().abs_diff(other.ordinal())
    }

    pub(crate) fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub(crate) fn last_day(&self) -> Option<NaiveDate> {
        self.next().first_day().and_then(|d| d.pred_opt())
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
