//! Peak calendar periods and the seasonality strength score.

use super::group::{mean_count_by, PeakRanking};
use crate::core::PreparedRecord;
use crate::error::{Result, SeasonalError};
use crate::utils::{coefficient_of_variation, mean};

/// Calendar months ranked by mean count per record, across all years.
pub fn peak_months(records: &[PreparedRecord]) -> PeakRanking {
    PeakRanking::from_means(&mean_count_by(records, PreparedRecord::month))
}

/// Quarters ranked by mean count per record, across all years.
pub fn peak_quarters(records: &[PreparedRecord]) -> PeakRanking {
    PeakRanking::from_means(&mean_count_by(records, PreparedRecord::quarter))
}

/// Coefficient of variation of the per-month means, clamped into [0, 1].
///
/// Uses the sample standard deviation. A single month gives 0.0. Fails with
/// [`SeasonalError::DivisionByZero`] when there are no records or the mean
/// of the month means is zero.
pub fn seasonality_strength(records: &[PreparedRecord]) -> Result<f64> {
    let month_means: Vec<f64> = mean_count_by(records, PreparedRecord::month)
        .into_values()
        .collect();

    if mean(&month_means).map_or(true, |m| m == 0.0) {
        return Err(SeasonalError::division_by_zero("mean of monthly means"));
    }

    // A single month has no observable spread.
    let cv = coefficient_of_variation(&month_means).unwrap_or(0.0);
    Ok(cv.clamp(0.0, 1.0))
}
