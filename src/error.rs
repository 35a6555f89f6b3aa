//! Error types for the seasonal-trends library.

use thiserror::Error;

/// Result type alias for seasonal analysis operations.
pub type Result<T> = std::result::Result<T, SeasonalError>;

/// Errors that can occur while preparing or analysing a count series.
///
/// Insufficient history for decomposition is not an error: it is reported as
/// [`DecompositionResult::InsufficientData`](crate::seasonality::DecompositionResult).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeasonalError {
    /// A field could not be converted to the expected type.
    #[error("row {row}: cannot convert {field} value {value:?}: {reason}")]
    TypeConversion {
        row: usize,
        field: String,
        value: String,
        reason: String,
    },

    /// A statistic's denominator is zero or undefined.
    #[error("division by zero: {quantity} is undefined")]
    DivisionByZero { quantity: String },

    /// Counts sum past the range of a 64-bit total.
    #[error("count overflow: row {row} pushes the total past u64::MAX in {period}")]
    CountOverflow { row: usize, period: String },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Structurally invalid input table.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The decomposition algorithm failed.
    #[error("decomposition failed: {0}")]
    Decomposition(String),
}

impl SeasonalError {
    pub(crate) fn division_by_zero(quantity: &str) -> Self {
        SeasonalError::DivisionByZero {
            quantity: quantity.to_string(),
        }
    }
}
