//! Monthly decomposition results.

use super::decomposer::{Components, Decomposer};
use crate::aggregation::{monthly_totals, totals_as_f64, GapPolicy, MonthlyAggregate};
use crate::core::{MonthKey, PreparedRecord};
use crate::error::{Result, SeasonalError};
use crate::utils::variance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Monthly series split into additive components, keyed by month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    /// Seasonal cycle length in months.
    pub period: usize,
    /// Name of the algorithm that produced the components.
    pub method: String,
    pub observed: BTreeMap<MonthKey, f64>,
    pub trend: BTreeMap<MonthKey, f64>,
    pub seasonal: BTreeMap<MonthKey, f64>,
    pub residual: BTreeMap<MonthKey, f64>,
}

impl Decomposition {
    fn from_components(
        months: &[MonthlyAggregate],
        period: usize,
        method: &str,
        components: Components,
    ) -> Result<Self> {
        let n = months.len();
        for (name, len) in [
            ("trend", components.trend.len()),
            ("seasonal", components.seasonal.len()),
            ("residual", components.residual.len()),
        ] {
            if len != n {
                return Err(SeasonalError::Decomposition(format!(
                    "{} component has {} points, expected {}",
                    name, len, n
                )));
            }
        }

        let keyed = |values: Vec<f64>| -> BTreeMap<MonthKey, f64> {
            months.iter().map(|m| m.period).zip(values).collect()
        };

        Ok(Self {
            period,
            method: method.to_string(),
            observed: keyed(totals_as_f64(months)),
            trend: keyed(components.trend),
            seasonal: keyed(components.seasonal),
            residual: keyed(components.residual),
        })
    }

    /// Number of months decomposed.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Seasonal strength: `1 - Var(residual) / Var(seasonal + residual)`,
    /// clamped into [0, 1].
    pub fn seasonal_strength(&self) -> f64 {
        strength(&self.seasonal, &self.residual)
    }

    /// Trend strength: `1 - Var(residual) / Var(trend + residual)`, clamped
    /// into [0, 1].
    pub fn trend_strength(&self) -> f64 {
        strength(&self.trend, &self.residual)
    }
}

fn strength(component: &BTreeMap<MonthKey, f64>, residual: &BTreeMap<MonthKey, f64>) -> f64 {
    let resid: Vec<f64> = residual.values().copied().collect();
    let combined: Vec<f64> = component.values().zip(&resid).map(|(c, r)| c + r).collect();

    match (variance(&resid), variance(&combined)) {
        (Some(var_r), Some(var_c)) if var_c >= 1e-10 => (1.0 - var_r / var_c).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Outcome of a monthly decomposition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecompositionResult {
    /// The series was decomposed.
    Decomposed(Decomposition),
    /// Fewer than two full cycles of monthly data were available.
    InsufficientData {
        required_periods: usize,
        available_periods: usize,
    },
}

impl DecompositionResult {
    pub fn is_decomposed(&self) -> bool {
        matches!(self, DecompositionResult::Decomposed(_))
    }

    pub fn decomposition(&self) -> Option<&Decomposition> {
        match self {
            DecompositionResult::Decomposed(d) => Some(d),
            DecompositionResult::InsufficientData { .. } => None,
        }
    }
}

/// Decompose monthly totals of `records` with the given algorithm.
///
/// Months without records inside the observed span are zero-filled so the
/// algorithm sees a regular series. With fewer than `2 * period` months the
/// algorithm is not called.
pub fn decompose_monthly(
    records: &[PreparedRecord],
    period: usize,
    decomposer: &dyn Decomposer,
) -> Result<DecompositionResult> {
    if period == 0 {
        return Err(SeasonalError::InvalidParameter(
            "period must be positive".to_string(),
        ));
    }

    let months = monthly_totals(records, GapPolicy::ZeroFill);
    let required = 2 * period;
    if months.len() < required {
        debug!(
            required,
            available = months.len(),
            "not enough monthly data to decompose"
        );
        return Ok(DecompositionResult::InsufficientData {
            required_periods: required,
            available_periods: months.len(),
        });
    }

    let series = totals_as_f64(&months);
    let components = decomposer.decompose(&series, period)?;

    let error = components.max_reconstruction_error(&series);
    if error > 1e-6 {
        warn!(method = decomposer.name(), error, "decomposition does not reproduce the series");
    }

    debug!(method = decomposer.name(), months = months.len(), period, "decomposed monthly totals");
    Decomposition::from_components(&months, period, decomposer.name(), components)
        .map(DecompositionResult::Decomposed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seasonality::ClassicalDecomposition;
    use chrono::NaiveDate;
    use std::cell::Cell;

    struct CountingDecomposer {
        calls: Cell<usize>,
    }

    impl Decomposer for CountingDecomposer {
        fn decompose(&self, series: &[f64], _period: usize) -> Result<Components> {
            self.calls.set(self.calls.get() + 1);
            Ok(Components {
                trend: series.to_vec(),
                seasonal: vec![0.0; series.len()],
                residual: vec![0.0; series.len()],
            })
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct TruncatingDecomposer;

    impl Decomposer for TruncatingDecomposer {
        fn decompose(&self, series: &[f64], _period: usize) -> Result<Components> {
            let n = series.len() - 1;
            Ok(Components {
                trend: vec![0.0; n],
                seasonal: vec![0.0; n],
                residual: vec![0.0; n],
            })
        }

        fn name(&self) -> &'static str {
            "truncating"
        }
    }

    fn monthly_records(months: usize) -> Vec<PreparedRecord> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..months)
            .map(|i| {
                let date = start.checked_add_months(chrono::Months::new(i as u32)).unwrap();
                PreparedRecord::new(date, 100 + (i % 12) as u64 * 10)
            })
            .collect()
    }

    #[test]
    fn insufficient_data_skips_algorithm() {
        let decomposer = CountingDecomposer { calls: Cell::new(0) };
        let result = decompose_monthly(&monthly_records(23), 12, &decomposer).unwrap();

        assert_eq!(
            result,
            DecompositionResult::InsufficientData {
                required_periods: 24,
                available_periods: 23,
            }
        );
        assert_eq!(decomposer.calls.get(), 0);
    }

    #[test]
    fn gaps_are_zero_filled_before_decomposing() {
        let mut records = monthly_records(24);
        records.remove(5);
        let decomposer = CountingDecomposer { calls: Cell::new(0) };

        let result = decompose_monthly(&records, 12, &decomposer).unwrap();
        let d = result.decomposition().unwrap();

        assert_eq!(decomposer.calls.get(), 1);
        assert_eq!(d.len(), 24);
        assert_eq!(d.observed[&MonthKey::new(2020, 6).unwrap()], 0.0);
        assert_eq!(d.method, "counting");
    }

    #[test]
    fn mismatched_components_are_rejected() {
        let err = decompose_monthly(&monthly_records(24), 12, &TruncatingDecomposer).unwrap_err();
        assert!(matches!(err, SeasonalError::Decomposition(_)));
    }

    #[test]
    fn zero_period_is_invalid() {
        let err = decompose_monthly(&monthly_records(24), 0, &ClassicalDecomposition::new()).unwrap_err();
        assert!(matches!(err, SeasonalError::InvalidParameter(_)));
    }

    #[test]
    fn strengths_are_bounded() {
        let result = decompose_monthly(&monthly_records(36), 12, &ClassicalDecomposition::new()).unwrap();
        let d = result.decomposition().unwrap();

        assert!(d.seasonal_strength() > 0.9);
        assert!((0.0..=1.0).contains(&d.trend_strength()));
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let result = DecompositionResult::InsufficientData {
            required_periods: 24,
            available_periods: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["required_periods"], 24);
    }
}
