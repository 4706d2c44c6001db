//! Calendar month bucket (`YYYY-MM`).

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A calendar month, ordered chronologically.
///
/// Serialized as the `YYYY-MM` label used by consumption buckets and forecast points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// `month` is 1-based (January = 1).
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DomainError::invalid_month(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of year, 1..=12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month `n` months after this one.
    pub fn plus_months(&self, n: u32) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) + n as i64;
        Self {
            year: zero_based.div_euclid(12) as i32,
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn succ(&self) -> Self {
        self.plus_months(1)
    }
}

impl ValueObject for YearMonth {}

impl core::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| DomainError::invalid_month(s.to_string()))?;
        if y.len() != 4 || m.len() != 2 {
            return Err(DomainError::invalid_month(s.to_string()));
        }
        let year = y
            .parse::<i32>()
            .map_err(|_| DomainError::invalid_month(s.to_string()))?;
        let month = m
            .parse::<u32>()
            .map_err(|_| DomainError::invalid_month(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
