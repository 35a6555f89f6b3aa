//! The combined seasonal report.

use crate::aggregation::{
    monthly_totals, peak_months, peak_quarters, seasonality_strength, total_count, totals_as_f64,
    PeakRanking,
};
use crate::core::PreparedRecord;
use crate::detection::{detect_anomalies, AnomalyConfig, AnomalyRecord};
use crate::error::{Result, SeasonalError};
use crate::utils::mean;
use serde::{Deserialize, Serialize};

/// Seasonal insights for one count series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalSummary {
    pub peak_months: PeakRanking,
    pub peak_quarters: PeakRanking,
    /// Coefficient of variation of month means, in [0, 1].
    pub seasonality_strength: f64,
    pub anomalous_periods: Vec<AnomalyRecord>,
    pub total_count: u64,
    pub average_monthly_count: f64,
}

impl SeasonalSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Build the summary for `records`.
///
/// Monthly totals for anomalies and the monthly average share the gap
/// policy in `anomaly`.
pub fn summarize(records: &[PreparedRecord], anomaly: &AnomalyConfig) -> Result<SeasonalSummary> {
    let seasonality_strength = seasonality_strength(records)?;

    let totals = totals_as_f64(&monthly_totals(records, anomaly.gaps));
    let average_monthly_count =
        mean(&totals).ok_or_else(|| SeasonalError::division_by_zero("average monthly count"))?;

    Ok(SeasonalSummary {
        peak_months: peak_months(records),
        peak_quarters: peak_quarters(records),
        seasonality_strength,
        anomalous_periods: detect_anomalies(records, anomaly),
        total_count: total_count(records),
        average_monthly_count,
    })
}
