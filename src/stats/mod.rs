//! Statistical helpers shared by the scoring code.
//!
//! - [`Summary`]: Descriptive statistics (mean, median, std_dev, percentiles)
//! - [`mean`], [`std_dev`]: Basic statistical functions
//! - [`min_max`]: Extremes of the finite values in a sample
//! - [`trapezoid_area`]: Area under a piecewise-linear curve

use serde::{Deserialize, Serialize};

/// Descriptive statistics for a set of measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl Summary {
    /// Compute summary statistics for a slice of values.
    ///
    /// Returns `None` if the slice is empty.
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = sorted.len();

        Some(Self {
            count,
            mean: mean(&sorted),
            median: percentile_sorted(&sorted, 0.5),
            std_dev: std_dev(&sorted),
            min: sorted[0],
            max: sorted[count - 1],
            p5: percentile_sorted(&sorted, 0.05),
            p25: percentile_sorted(&sorted, 0.25),
            p75: percentile_sorted(&sorted, 0.75),
            p95: percentile_sorted(&sorted, 0.95),
        })
    }
}

/// Compute arithmetic mean.
///
/// # Example
///
/// ```
/// use watermark_eval::stats::mean;
///
/// assert!((mean(&[1.0, 2.0, 3.0, 4.0, 5.0]) - 3.0).abs() < 0.001);
/// ```
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute sample standard deviation.
///
/// Uses Bessel's correction (N-1 denominator). Fewer than two values give 0.
///
/// # Example
///
/// ```
/// use watermark_eval::stats::std_dev;
///
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((std_dev(&values) - 2.138).abs() < 0.001);
/// ```
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Minimum and maximum of the finite values, or `None` if there are none.
///
/// ```
/// use watermark_eval::stats::min_max;
///
/// assert_eq!(min_max(&[3.0, f64::NAN, 1.0, 7.5]), Some((1.0, 7.5)));
/// assert_eq!(min_max(&[]), None);
/// ```
#[must_use]
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Area under a curve by the trapezoidal rule.
///
/// Points are `(x, y)` pairs and must already be sorted by `x`.
///
/// ```
/// use watermark_eval::stats::trapezoid_area;
///
/// let area = trapezoid_area(&[(0.0, 0.0), (0.5, 1.0), (1.0, 1.0)]);
/// assert!((area - 0.75).abs() < 1e-12);
/// ```
#[must_use]
pub fn trapezoid_area(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            (x1 - x0) * (y0 + y1) / 2.0
        })
        .sum()
}

/// Internal: Calculate percentile from pre-sorted values.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let p = p.clamp(0.0, 1.0);

    let idx = p * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_compute() {
        let values = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        let summary = Summary::compute(&values).unwrap();

        assert_eq!(summary.count, 5);
        assert!((summary.mean - 3.0).abs() < 0.001);
        assert!((summary.median - 3.0).abs() < 0.001);
        assert!((summary.min - 1.0).abs() < 0.001);
        assert!((summary.max - 5.0).abs() < 0.001);
        assert!((summary.std_dev - 1.5811).abs() < 0.001);
        // R-7 interpolation
        assert!((summary.p25 - 2.0).abs() < 0.001);
        assert!((summary.p5 - 1.2).abs() < 0.001);
    }

    #[test]
    fn test_summary_even_count_median() {
        let summary = Summary::compute(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.median, 2.5);
        let single = Summary::compute(&[5.0]).unwrap();
        assert_eq!(single.median, 5.0);
        assert_eq!(single.p95, 5.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(Summary::compute(&[]).is_none());
    }

    #[test]
    fn test_std_dev_single_value() {
        assert_eq!(std_dev(&[4.2]), 0.0);
    }

    #[test]
    fn test_min_max_all_invalid() {
        assert_eq!(min_max(&[f64::NAN, f64::INFINITY]), None);
    }

    #[test]
    fn test_trapezoid_degenerate() {
        assert_eq!(trapezoid_area(&[]), 0.0);
        assert_eq!(trapezoid_area(&[(0.3, 0.9)]), 0.0);
    }
}
