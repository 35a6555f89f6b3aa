//! Statistical utility functions.
//!
//! Undefined statistics (empty input, too few points) are reported as `None`
//! so callers decide how to surface them.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the sample variance of a slice (n-1 denominator).
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Calculate the sample standard deviation of a slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Sample standard deviation divided by the mean.
///
/// `None` when the mean is zero or either statistic is undefined.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m == 0.0 {
        return None;
    }
    Some(std_dev(values)? / m)
}

/// Least-squares line through `(x, y)` points.
///
/// Returns `(slope, intercept)`, or `None` with fewer than two distinct x.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mx = mean(&x[..n])?;
    let my = mean(&y[..n])?;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        sxx += dx * dx;
        sxy += dx * (y[i] - my);
    }
    if sxx < 1e-12 {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, my - slope * mx))
}
