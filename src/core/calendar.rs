//! Calendar utilities.
//!
//! Every function here is a pure function of a date value: Gregorian months
//! and quarters, ISO-8601 week numbering and ordinal days.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Calendar fields derived from a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarFields {
    /// Month of year, 1..=12.
    pub month: u32,
    /// Quarter of year, 1..=4.
    pub quarter: u32,
    /// Gregorian year.
    pub year: i32,
    /// ISO-8601 week number, 1..=53.
    pub iso_week: u32,
    /// Ordinal day of year, 1..=366.
    pub day_of_year: u32,
}

impl CalendarFields {
    /// Derive all calendar fields from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            quarter: quarter_of(date),
            year: date.year(),
            iso_week: date.iso_week().week(),
            day_of_year: date.ordinal(),
        }
    }
}

/// Quarter of year (1..=4) for a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Identifier of one calendar month.
///
/// Orders chronologically and renders as `YYYY-MM`, which is also its
/// serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, returning `None` if `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Number of months from `self` to `other`, inclusive of both ends.
    ///
    /// Returns 0 when `other` precedes `self`.
    pub fn months_through(&self, other: &MonthKey) -> usize {
        let start = self.year as i64 * 12 + (self.month as i64 - 1);
        let end = other.year as i64 * 12 + (other.month as i64 - 1);
        if end < start {
            0
        } else {
            (end - start + 1) as usize
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error parsing a `YYYY-MM` month key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthKeyError(String);

impl fmt::Display for ParseMonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month key {:?}, expected YYYY-MM", self.0)
    }
}

impl std::error::Error for ParseMonthKeyError {}

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseMonthKeyError(s.to_string());
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        MonthKey::new(year, month).ok_or_else(err)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
