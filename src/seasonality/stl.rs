//! STL (Seasonal-Trend decomposition using LOESS).
//!
//! An alternative to [`ClassicalDecomposition`](super::ClassicalDecomposition)
//! that smooths each cycle-subseries locally instead of averaging it, so the
//! seasonal shape may drift from year to year.

use super::decomposer::{Components, Decomposer};
use crate::error::{Result, SeasonalError};

/// STL decomposition configuration.
///
/// Smoothing spans left unset are derived from the period at decomposition
/// time following Cleveland et al. (1990).
#[derive(Debug, Clone)]
pub struct Stl {
    /// Seasonal LOESS span (ns).
    seasonal_smoothness: Option<usize>,
    /// Trend LOESS span (nt).
    trend_smoothness: Option<usize>,
    inner_iterations: usize,
    /// Robustness iterations; 0 disables robust reweighting.
    outer_iterations: usize,
}

impl Default for Stl {
    fn default() -> Self {
        Self {
            seasonal_smoothness: None,
            trend_smoothness: None,
            inner_iterations: 2,
            outer_iterations: 0,
        }
    }
}

impl Stl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seasonal smoothing span; even values are rounded up to odd.
    pub fn with_seasonal_smoothness(mut self, ns: usize) -> Self {
        self.seasonal_smoothness = Some(ns | 1);
        self
    }

    /// Set the trend smoothing span; even values are rounded up to odd.
    pub fn with_trend_smoothness(mut self, nt: usize) -> Self {
        self.trend_smoothness = Some(nt | 1);
        self
    }

    pub fn with_inner_iterations(mut self, n: usize) -> Self {
        self.inner_iterations = n.max(1);
        self
    }

    /// Enable robust fitting with the usual six reweighting passes.
    pub fn robust(mut self) -> Self {
        self.outer_iterations = 6;
        self
    }

    fn spans(&self, period: usize) -> (usize, usize, usize) {
        let ns = self.seasonal_smoothness.unwrap_or(period | 1);
        let nt = self.trend_smoothness.unwrap_or_else(|| {
            let p = period as f64;
            let nt = (1.5 * p / (1.0 - 1.5 / ns as f64)).ceil() as usize;
            nt | 1
        });
        let nl = period | 1;
        (ns, nt, nl)
    }
}

impl Decomposer for Stl {
    fn decompose(&self, series: &[f64], period: usize) -> Result<Components> {
        let n = series.len();
        if period < 2 {
            return Err(SeasonalError::InvalidParameter(
                "STL period must be at least 2".to_string(),
            ));
        }
        if n < 2 * period {
            return Err(SeasonalError::Decomposition(format!(
                "series of length {} is shorter than two cycles of period {}",
                n, period
            )));
        }

        let (ns, nt, nl) = self.spans(period);
        let mut seasonal = vec![0.0; n];
        let mut trend = vec![0.0; n];
        let mut weights = vec![1.0; n];

        for pass in 0..=self.outer_iterations {
            for _ in 0..self.inner_iterations {
                let detrended: Vec<f64> = series.iter().zip(&trend).map(|(y, t)| y - t).collect();
                let cycle = smooth_cycle_subseries(&detrended, &weights, period, ns);
                let low_pass = low_pass_filter(&cycle, period, nl);
                for i in 0..n {
                    seasonal[i] = cycle[i] - low_pass[i];
                }

                let deseasonalized: Vec<f64> =
                    series.iter().zip(&seasonal).map(|(y, s)| y - s).collect();
                trend = tricube_smooth(&deseasonalized, nt, &weights);
            }

            if pass < self.outer_iterations {
                let remainder: Vec<f64> = (0..n).map(|i| series[i] - seasonal[i] - trend[i]).collect();
                weights = robustness_weights(&remainder);
            }
        }

        let residual: Vec<f64> = (0..n).map(|i| series[i] - seasonal[i] - trend[i]).collect();

        Ok(Components {
            trend,
            seasonal,
            residual,
        })
    }

    fn name(&self) -> &'static str {
        "stl"
    }
}

/// Smooth each cycle-subseries (all points sharing a position in the cycle).
fn smooth_cycle_subseries(detrended: &[f64], weights: &[f64], period: usize, span: usize) -> Vec<f64> {
    let mut result = vec![0.0; detrended.len()];

    for pos in 0..period {
        let indices: Vec<usize> = (pos..detrended.len()).step_by(period).collect();
        let values: Vec<f64> = indices.iter().map(|&i| detrended[i]).collect();
        let w: Vec<f64> = indices.iter().map(|&i| weights[i]).collect();

        let smoothed = tricube_smooth(&values, span, &w);
        for (&idx, value) in indices.iter().zip(smoothed) {
            result[idx] = value;
        }
    }

    result
}

/// Moving averages of length period, period and 3, then a LOESS pass.
fn low_pass_filter(series: &[f64], period: usize, span: usize) -> Vec<f64> {
    let ma = moving_average(&moving_average(&moving_average(series, period), period), 3);
    tricube_smooth(&ma, span, &vec![1.0; series.len()])
}

/// Centred moving average, truncated at the ends.
fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    let half = window / 2;

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(n);
            series[start..end].iter().sum::<f64>() / (end - start) as f64
        })
        .collect()
}

/// Tricube-weighted local mean (a degree-zero LOESS).
fn tricube_smooth(values: &[f64], span: usize, weights: &[f64]) -> Vec<f64> {
    let n = values.len();
    let half = span / 2;
    let max_dist = half as f64 + 1.0;

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(n);

            let mut sum_w = 0.0;
            let mut sum_v = 0.0;
            for j in start..end {
                let u = (i as f64 - j as f64).abs() / max_dist;
                let w = (1.0 - u.powi(3)).powi(3) * weights[j];
                sum_w += w;
                sum_v += w * values[j];
            }

            if sum_w > 0.0 {
                sum_v / sum_w
            } else {
                values[i]
            }
        })
        .collect()
}

/// Bisquare weights from the median absolute remainder.
fn robustness_weights(remainder: &[f64]) -> Vec<f64> {
    let mut abs: Vec<f64> = remainder.iter().map(|r| r.abs()).collect();
    abs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = abs.len();
    let median = if n % 2 == 0 {
        (abs[n / 2 - 1] + abs[n / 2]) / 2.0
    } else {
        abs[n / 2]
    };

    let h = 6.0 * median;
    if h < 1e-10 {
        return vec![1.0; n];
    }

    remainder
        .iter()
        .map(|r| {
            let u = r.abs() / h;
            if u < 1.0 {
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}
