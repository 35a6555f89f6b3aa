//! Monthly anomaly detection by z-score.

use crate::aggregation::{monthly_totals, GapPolicy, MonthlyAggregate};
use crate::core::{MonthKey, PreparedRecord};
use crate::error::{Result, SeasonalError};
use crate::utils::{mean, std_dev};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default z-score threshold.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Direction of an anomalous month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Above the mean.
    Spike,
    /// At or below the mean.
    Drop,
}

/// A month that deviates from the mean by more than the threshold.
///
/// `count` is always the month total, whichever measure was scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub period: MonthKey,
    pub count: u64,
    /// Z-score of the configured [`AnomalyMeasure`]. Under the default
    /// `MeanPerRecord` it scores the month's per-record rate, not `count`.
    pub z_score: f64,
    pub kind: AnomalyKind,
}

/// The per-month value that is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyMeasure {
    /// Mean count per record in the month. For daily data this is the daily
    /// rate, so calendar-length differences between months do not register.
    #[default]
    MeanPerRecord,
    /// Sum of counts in the month.
    Total,
}

impl AnomalyMeasure {
    fn value(&self, month: &MonthlyAggregate) -> f64 {
        match self {
            AnomalyMeasure::MeanPerRecord => month.mean_per_record(),
            AnomalyMeasure::Total => month.total as f64,
        }
    }
}

/// Z-score of one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyZScore {
    pub period: MonthKey,
    pub total: u64,
    pub z_score: f64,
}

/// Configuration for anomaly detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Absolute z-score a month must exceed to be flagged.
    pub threshold: f64,
    /// Whether empty months inside the span count as zero-total months.
    pub gaps: GapPolicy,
    pub measure: AnomalyMeasure,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            gaps: GapPolicy::Skip,
            measure: AnomalyMeasure::MeanPerRecord,
        }
    }
}

impl AnomalyConfig {
    /// Use the given z-score threshold.
    pub fn z_score(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Zero-fill months without records before scoring.
    pub fn with_zero_filled_gaps(mut self) -> Self {
        self.gaps = GapPolicy::ZeroFill;
        self
    }

    pub fn with_measure(mut self, measure: AnomalyMeasure) -> Self {
        self.measure = measure;
        self
    }

    /// Check the threshold is a finite, non-negative number.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SeasonalError::InvalidParameter(format!(
                "anomaly threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Z-scores of monthly values using the sample standard deviation.
///
/// Empty when fewer than two months exist or all values are equal.
pub fn monthly_z_scores(records: &[PreparedRecord], config: &AnomalyConfig) -> Vec<MonthlyZScore> {
    let months = monthly_totals(records, config.gaps);
    let values: Vec<f64> = months.iter().map(|m| config.measure.value(m)).collect();

    let (m, sd) = match (mean(&values), std_dev(&values)) {
        (Some(m), Some(sd)) if sd >= 1e-10 => (m, sd),
        _ => {
            trace!(months = months.len(), "monthly values have no spread to score");
            return Vec::new();
        }
    };

    months
        .iter()
        .zip(&values)
        .map(|(month, &value)| MonthlyZScore {
            period: month.period,
            total: month.total,
            z_score: (value - m) / sd,
        })
        .collect()
}

/// Flag months whose absolute z-score exceeds the configured threshold.
///
/// Results are in chronological order.
pub fn detect_anomalies(records: &[PreparedRecord], config: &AnomalyConfig) -> Vec<AnomalyRecord> {
    let anomalies: Vec<AnomalyRecord> = monthly_z_scores(records, config)
        .into_iter()
        .filter(|z| z.z_score.abs() > config.threshold)
        .map(|z| AnomalyRecord {
            period: z.period,
            count: z.total,
            z_score: z.z_score,
            kind: if z.z_score > 0.0 {
                AnomalyKind::Spike
            } else {
                AnomalyKind::Drop
            },
        })
        .collect();

    debug!(
        threshold = config.threshold,
        measure = ?config.measure,
        flagged = anomalies.len(),
        "scored monthly values"
    );
    anomalies
}
