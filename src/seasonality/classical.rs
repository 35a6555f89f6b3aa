//! Classical additive decomposition.
//!
//! - Trend: centred moving average (a 2×m average for even periods), with
//!   both ends extrapolated by least-squares lines so the trend covers the
//!   whole series
//! - Seasonal: per-position means of the detrended series, centred on zero
//!   and repeated over the series
//! - Residual: whatever remains

use super::decomposer::{Components, Decomposer};
use crate::error::{Result, SeasonalError};
use crate::utils::{linear_fit, mean};

/// Moving-average decomposition with frequency-based trend extrapolation.
#[derive(Debug, Clone, Default)]
pub struct ClassicalDecomposition {
    /// Window for each end's extrapolation fit; the line uses one fewer
    /// value. Defaults to the seasonal period.
    extrapolation_points: Option<usize>,
}

impl ClassicalDecomposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the trend end extrapolations over `points` values instead of one
    /// seasonal period.
    pub fn with_extrapolation_points(mut self, points: usize) -> Self {
        self.extrapolation_points = Some(points.max(2));
        self
    }
}

impl Decomposer for ClassicalDecomposition {
    fn decompose(&self, series: &[f64], period: usize) -> Result<Components> {
        let n = series.len();
        if period == 0 {
            return Err(SeasonalError::InvalidParameter(
                "period must be positive".to_string(),
            ));
        }
        if n < 2 * period {
            return Err(SeasonalError::Decomposition(format!(
                "series of length {} is shorter than two cycles of period {}",
                n, period
            )));
        }

        let mut trend = centred_moving_average(series, period);
        let points = self.extrapolation_points.unwrap_or(period);
        extrapolate_trend(&mut trend, points);
        let trend: Vec<f64> = trend
            .into_iter()
            .map(|t| t.ok_or_else(|| SeasonalError::Decomposition("trend has undefined points".to_string())))
            .collect::<Result<_>>()?;

        let detrended: Vec<f64> = series.iter().zip(&trend).map(|(y, t)| y - t).collect();

        let mut averages: Vec<f64> = (0..period)
            .map(|pos| {
                let subseries: Vec<f64> = detrended.iter().skip(pos).step_by(period).copied().collect();
                mean(&subseries).unwrap_or(0.0)
            })
            .collect();
        let centre = mean(&averages).unwrap_or(0.0);
        for a in &mut averages {
            *a -= centre;
        }

        let seasonal: Vec<f64> = (0..n).map(|i| averages[i % period]).collect();
        let residual: Vec<f64> = detrended.iter().zip(&seasonal).map(|(d, s)| d - s).collect();

        Ok(Components {
            trend,
            seasonal,
            residual,
        })
    }

    fn name(&self) -> &'static str {
        "classical"
    }
}

/// Centred moving average; `None` where the window runs off either end.
fn centred_moving_average(series: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] = 0.5 / period as f64;
        w[period] = 0.5 / period as f64;
        w
    } else {
        vec![1.0 / period as f64; period]
    };
    let half = weights.len() / 2;

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &series[i - half..=i + half];
            Some(window.iter().zip(&weights).map(|(y, w)| y * w).sum())
        })
        .collect()
}

/// Fill undefined trend ends with least-squares lines.
///
/// Each line is fitted over `points - 1` defined values: the first ones for
/// the leading end, those preceding the last defined value for the trailing
/// end.
/// With too few points for a line the nearest defined value is repeated.
fn extrapolate_trend(trend: &mut [Option<f64>], points: usize) {
    let (front, back) = match (
        trend.iter().position(Option::is_some),
        trend.iter().rposition(Option::is_some),
    ) {
        (Some(f), Some(b)) => (f, b),
        _ => return,
    };

    if front > 0 {
        let front_last = (front + points.saturating_sub(1)).min(back);
        let line = fit_segment(trend, front, front_last);
        let fallback = trend[front].unwrap_or(0.0);
        for (i, t) in trend.iter_mut().enumerate().take(front) {
            *t = Some(line.map_or(fallback, |(k, c)| k * i as f64 + c));
        }
    }

    if back + 1 < trend.len() {
        let back_first = back.saturating_sub(points.saturating_sub(1)).max(front);
        let line = fit_segment(trend, back_first, back);
        let fallback = trend[back].unwrap_or(0.0);
        for (i, t) in trend.iter_mut().enumerate().skip(back + 1) {
            *t = Some(line.map_or(fallback, |(k, c)| k * i as f64 + c));
        }
    }
}

fn fit_segment(trend: &[Option<f64>], start: usize, end: usize) -> Option<(f64, f64)> {
    let (x, y): (Vec<f64>, Vec<f64>) = (start..end)
        .filter_map(|i| trend[i].map(|t| (i as f64, t)))
        .unzip();
    linear_fit(&x, &y)
}
