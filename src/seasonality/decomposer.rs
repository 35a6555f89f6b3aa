//! The pluggable decomposition interface.

use crate::error::Result;

/// Additive components of a regularly spaced series.
#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

impl Components {
    /// Largest absolute gap between `series` and trend + seasonal + residual.
    pub fn max_reconstruction_error(&self, series: &[f64]) -> f64 {
        series
            .iter()
            .zip(&self.trend)
            .zip(&self.seasonal)
            .zip(&self.residual)
            .map(|(((y, t), s), r)| (y - (t + s + r)).abs())
            .fold(0.0, f64::max)
    }
}

/// An additive seasonal decomposition algorithm.
///
/// Implementations receive a gap-free series of at least `2 * period`
/// points and must return components of the same length whose sum
/// reproduces the input.
pub trait Decomposer {
    /// Decompose `series` with seasonal cycle length `period`.
    fn decompose(&self, series: &[f64], period: usize) -> Result<Components>;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}
