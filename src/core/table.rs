//! Reading input rows from a tabular collaborator.
//!
//! A table is a JSON array of objects (one per row). The date and count
//! columns are located by name.

use super::record::{parse_date, InputRow};
use crate::error::{Result, SeasonalError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names of the date and count columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub count: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            count: "enrolments".to_string(),
        }
    }
}

impl ColumnNames {
    pub fn new(date: impl Into<String>, count: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            count: count.into(),
        }
    }
}

/// Convert JSON records into input rows.
///
/// Dates are parsed here so a bad value is reported under its column name.
pub fn rows_from_records(records: &Value, columns: &ColumnNames) -> Result<Vec<InputRow>> {
    let rows = records.as_array().ok_or_else(|| {
        SeasonalError::InvalidInput("expected a JSON array of row objects".to_string())
    })?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<InputRow> {
            let object = row.as_object().ok_or_else(|| {
                SeasonalError::InvalidInput(format!("row {} is not a JSON object", i))
            })?;

            let date = object
                .get(&columns.date)
                .ok_or_else(|| conversion(i, &columns.date, "null", "column missing"))?;
            let date = match date {
                Value::String(s) => parse_date(s)
                    .ok_or_else(|| conversion(i, &columns.date, s, "unrecognised date format"))?,
                other => {
                    return Err(conversion(i, &columns.date, &other.to_string(), "expected a date string"))
                }
            };

            let count = object
                .get(&columns.count)
                .ok_or_else(|| conversion(i, &columns.count, "null", "column missing"))?;
            let count = count_value(count)
                .ok_or_else(|| conversion(i, &columns.count, &count.to_string(), "expected a non-negative integer"))?;

            Ok(InputRow::new(date, count))
        })
        .collect()
}

fn count_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    // Integral floats such as 12.0 come out of some exporters.
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
        .map(|f| f as u64)
}

fn conversion(row: usize, field: &str, value: &str, reason: &str) -> SeasonalError {
    SeasonalError::TypeConversion {
        row,
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn reads_default_columns() {
        let table = json!([
            {"date": "2024-01-01", "enrolments": 12},
            {"date": "2024-01-02", "enrolments": 7.0, "region": "north"},
        ]);

        let rows = rows_from_records(&table, &ColumnNames::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], InputRow::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 12));
        assert_eq!(rows[1].count, 7);
    }

    #[test]
    fn reads_custom_columns() {
        let table = json!([{"day": "2024-06-30", "n": 3}]);
        let rows = rows_from_records(&table, &ColumnNames::new("day", "n")).unwrap();
        assert_eq!(rows, vec![InputRow::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), 3)]);
    }

    #[test]
    fn rejects_negative_or_fractional_counts() {
        for bad in [json!(-1), json!(2.5), json!("12")] {
            let table = json!([{"date": "2024-01-01", "enrolments": bad}]);
            let err = rows_from_records(&table, &ColumnNames::default()).unwrap_err();
            assert!(
                matches!(err, SeasonalError::TypeConversion { ref field, .. } if field == "enrolments"),
                "unexpected error {:?}",
                err
            );
        }
    }

    #[test]
    fn reports_missing_column_with_row_index() {
        let table = json!([
            {"date": "2024-01-01", "enrolments": 1},
            {"enrolments": 2},
        ]);
        let err = rows_from_records(&table, &ColumnNames::default()).unwrap_err();
        assert_eq!(
            err,
            SeasonalError::TypeConversion {
                row: 1,
                field: "date".to_string(),
                value: "null".to_string(),
                reason: "column missing".to_string(),
            }
        );
    }

    #[test]
    fn bad_date_is_reported_under_its_column() {
        let table = json!([{"day": "2024-01-01", "n": 1}, {"day": "someday", "n": 2}]);
        let err = rows_from_records(&table, &ColumnNames::new("day", "n")).unwrap_err();
        assert_eq!(
            err,
            SeasonalError::TypeConversion {
                row: 1,
                field: "day".to_string(),
                value: "someday".to_string(),
                reason: "unrecognised date format".to_string(),
            }
        );
    }

    #[test]
    fn rejects_non_array_tables() {
        let err = rows_from_records(&json!({"date": []}), &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, SeasonalError::InvalidInput(_)));
    }
}
