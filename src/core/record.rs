//! Raw input rows and their prepared, calendar-enriched form.

use super::calendar::{CalendarFields, MonthKey};
use crate::error::{Result, SeasonalError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A timestamp as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// A calendar date.
    Date(NaiveDate),
    /// A date-time; only its date part is used.
    DateTime(NaiveDateTime),
    /// Text to be parsed as a date.
    Text(String),
}

impl DateValue {
    /// Resolve to a calendar date.
    ///
    /// `row` is only used to label the error.
    pub fn to_date(&self, row: usize) -> Result<NaiveDate> {
        match self {
            DateValue::Date(d) => Ok(*d),
            DateValue::DateTime(dt) => Ok(dt.date()),
            DateValue::Text(s) => parse_date(s).ok_or_else(|| SeasonalError::TypeConversion {
                row,
                field: "timestamp".to_string(),
                value: s.clone(),
                reason: "unrecognised date format".to_string(),
            }),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Date(date)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(dt: NaiveDateTime) -> Self {
        DateValue::DateTime(dt)
    }
}

impl From<&str> for DateValue {
    fn from(s: &str) -> Self {
        DateValue::Text(s.to_string())
    }
}

impl From<String> for DateValue {
    fn from(s: String) -> Self {
        DateValue::Text(s)
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a date from text.
///
/// Accepts ISO dates, slash-separated dates, naive date-times, RFC 3339
/// timestamps (the local date is kept) and bare `YYYY-MM` months, which map
/// to the first of the month.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    text.parse::<MonthKey>().ok().and_then(|k| k.first_day())
}

/// One raw observation: a timestamp and a non-negative count.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub timestamp: DateValue,
    pub count: u64,
}

impl InputRow {
    pub fn new(timestamp: impl Into<DateValue>, count: u64) -> Self {
        Self {
            timestamp: timestamp.into(),
            count,
        }
    }
}

/// An observation with its calendar fields resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedRecord {
    pub date: NaiveDate,
    pub count: u64,
    #[serde(flatten)]
    pub calendar: CalendarFields,
}

impl PreparedRecord {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self {
            date,
            count,
            calendar: CalendarFields::from_date(date),
        }
    }

    pub fn month(&self) -> u32 {
        self.calendar.month
    }

    pub fn quarter(&self) -> u32 {
        self.calendar.quarter
    }

    pub fn year(&self) -> i32 {
        self.calendar.year
    }

    pub fn iso_week(&self) -> u32 {
        self.calendar.iso_week
    }

    pub fn day_of_year(&self) -> u32 {
        self.calendar.day_of_year
    }

    /// The calendar month this record falls in.
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// Normalise raw rows into records sorted ascending by date.
///
/// The sort is stable, so rows sharing a date keep their input order. Fails
/// on the first timestamp that cannot be read as a date, and on the first row
/// that pushes the sum of all counts past `u64::MAX`. Every per-period total
/// of a prepared set therefore fits in a `u64`.
pub fn prepare(rows: &[InputRow]) -> Result<Vec<PreparedRecord>> {
    let mut records = rows
        .iter()
        .enumerate()
        .map(|(i, row)| -> Result<PreparedRecord> {
            Ok(PreparedRecord::new(row.timestamp.to_date(i)?, row.count))
        })
        .collect::<Result<Vec<_>>>()?;

    check_total(&records)?;
    records.sort_by_key(|r| r.date);

    debug!(
        rows = records.len(),
        first = ?records.first().map(|r| r.date),
        last = ?records.last().map(|r| r.date),
        "prepared count series"
    );

    Ok(records)
}

/// Sum of all counts, or the row (in input order) where it overflows.
fn check_total(records: &[PreparedRecord]) -> Result<u64> {
    records.iter().enumerate().try_fold(0u64, |total, (row, r)| {
        total
            .checked_add(r.count)
            .ok_or_else(|| SeasonalError::CountOverflow {
                row,
                period: r.month_key().to_string(),
            })
    })
}
