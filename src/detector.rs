//! The seasonal trend detector: prepared records plus every query over them.

use crate::aggregation::{
    monthly_totals, peak_months, peak_quarters, seasonality_strength, total_count, yearly_totals,
    GapPolicy, MonthlyAggregate, PeakRanking,
};
use crate::core::{prepare, rows_from_records, ColumnNames, InputRow, PreparedRecord};
use crate::detection::{detect_anomalies, monthly_z_scores, AnomalyConfig, AnomalyRecord, MonthlyZScore};
use crate::error::{Result, SeasonalError};
use crate::seasonality::{decompose_monthly, ClassicalDecomposition, Decomposer, DecompositionResult};
use crate::summary::{summarize, SeasonalSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Default seasonal period for monthly data.
pub const DEFAULT_PERIOD: usize = 12;

/// Detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Seasonal cycle length in months used by [`SeasonalTrendDetector::decompose`].
    pub period: usize,
    pub anomaly: AnomalyConfig,
    /// Column names used when reading JSON records.
    pub columns: ColumnNames,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            anomaly: AnomalyConfig::default(),
            columns: ColumnNames::default(),
        }
    }
}

impl DetectorConfig {
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn with_anomaly(mut self, anomaly: AnomalyConfig) -> Self {
        self.anomaly = anomaly;
        self
    }

    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Parse a configuration from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SeasonalError::InvalidParameter(format!("configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(SeasonalError::InvalidParameter(
                "period must be positive".to_string(),
            ));
        }
        self.anomaly.validate()
    }
}

/// Seasonal diagnostics over one count series.
///
/// Records are prepared once at construction and never change, so every
/// query takes `&self` and the detector can be shared across threads.
#[derive(Debug, Clone)]
pub struct SeasonalTrendDetector {
    records: Vec<PreparedRecord>,
    config: DetectorConfig,
}

impl SeasonalTrendDetector {
    /// Prepare `rows` with the default configuration.
    pub fn new(rows: &[InputRow]) -> Result<Self> {
        Self::with_config(rows, DetectorConfig::default())
    }

    pub fn with_config(rows: &[InputRow], config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let records = prepare(rows)?;
        debug!(records = records.len(), period = config.period, "seasonal trend detector ready");
        Ok(Self { records, config })
    }

    /// Build from a JSON array of row objects, using the configured column names.
    pub fn from_json_records(records: &serde_json::Value, config: DetectorConfig) -> Result<Self> {
        let rows = rows_from_records(records, &config.columns)?;
        Self::with_config(&rows, config)
    }

    /// Prepared records, ascending by date.
    pub fn records(&self) -> &[PreparedRecord] {
        &self.records
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decompose monthly totals with the configured period.
    pub fn decompose(&self) -> Result<DecompositionResult> {
        self.detect_seasonal_pattern(self.config.period)
    }

    /// Decompose monthly totals with classical additive decomposition.
    pub fn detect_seasonal_pattern(&self, period: usize) -> Result<DecompositionResult> {
        self.detect_seasonal_pattern_with(&ClassicalDecomposition::new(), period)
    }

    /// Decompose monthly totals with a caller-supplied algorithm.
    pub fn detect_seasonal_pattern_with(
        &self,
        decomposer: &dyn Decomposer,
        period: usize,
    ) -> Result<DecompositionResult> {
        decompose_monthly(&self.records, period, decomposer)
    }

    pub fn peak_months(&self) -> PeakRanking {
        peak_months(&self.records)
    }

    pub fn peak_quarters(&self) -> PeakRanking {
        peak_quarters(&self.records)
    }

    pub fn seasonality_strength(&self) -> Result<f64> {
        seasonality_strength(&self.records)
    }

    /// Anomalous months at the configured threshold and gap policy.
    pub fn anomalies(&self) -> Vec<AnomalyRecord> {
        detect_anomalies(&self.records, &self.config.anomaly)
    }

    /// Anomalous months at `threshold`, with the configured gap policy.
    pub fn detect_anomalous_periods(&self, threshold: f64) -> Result<Vec<AnomalyRecord>> {
        let config = self.config.anomaly.with_threshold(threshold);
        config.validate()?;
        Ok(detect_anomalies(&self.records, &config))
    }

    pub fn monthly_z_scores(&self) -> Vec<MonthlyZScore> {
        monthly_z_scores(&self.records, &self.config.anomaly)
    }

    pub fn monthly_totals(&self, gaps: GapPolicy) -> Vec<MonthlyAggregate> {
        monthly_totals(&self.records, gaps)
    }

    pub fn yearly_totals(&self) -> BTreeMap<i32, u64> {
        yearly_totals(&self.records)
    }

    pub fn total_count(&self) -> u64 {
        total_count(&self.records)
    }

    pub fn summary(&self) -> Result<SeasonalSummary> {
        summarize(&self.records, &self.config.anomaly)
    }
}
