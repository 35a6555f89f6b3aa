//! Core data structures: raw rows, prepared records and calendar fields.

pub mod calendar;
mod record;
mod table;

pub use calendar::{CalendarFields, MonthKey};
pub use record::{parse_date, prepare, DateValue, InputRow, PreparedRecord};
pub use table::{rows_from_records, ColumnNames};
