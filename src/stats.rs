//! Statistical utility functions shared across views
//!
//! Contains the quantile, box-plot and histogram summaries used by the
//! clinical distribution panels.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Whisker reach in units of the interquartile range
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Upper bound on automatic histogram bins
pub const MAX_HISTOGRAM_BINS: usize = 50;

/// Quantile of an ascending slice with linear interpolation
/// (Hyndman-Fan type 7, the default of numpy/pandas)
///
/// Algorithm:
/// 1. h = (n - 1) * prob
/// 2. result = x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])
pub fn quantile_sorted(sorted: &[f64], prob: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }

    let prob = prob.clamp(0.0, 1.0);
    let h = (n - 1) as f64 * prob;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Five-number summary with Tukey whiskers and outliers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub n: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within q1 - 1.5 * IQR
    pub lower_whisker: f64,
    /// Largest value within q3 + 1.5 * IQR
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarize the finite values, `None` if there are none
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let inside = sorted.iter().copied().filter(|&v| v >= low_fence && v <= high_fence);
        let lower_whisker = inside.clone().next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(Self {
            n: sorted.len(),
            mean: sorted.iter().mean(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// One histogram bin, half-open `[lower, upper)` except the last which is closed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Sturges' rule: ceil(log2(n)) + 1 bins, capped at [`MAX_HISTOGRAM_BINS`]
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let bins = (n as f64).log2().ceil() as usize + 1;
    bins.min(MAX_HISTOGRAM_BINS)
}

/// Equal-width histogram over the finite values
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || n_bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // A constant column gets a single unit-wide bin
    if min == max {
        return vec![HistogramBin {
            lower: min - 0.5,
            upper: max + 0.5,
            count: finite.len(),
        }];
    }

    let width = (max - min) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for v in &finite {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == n_bins { max } else { min + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_sorted_linear() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        assert!((quantile_sorted(&x, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile_sorted(&x, 0.25) - 1.75).abs() < 1e-12);
        assert_eq!(quantile_sorted(&x, 0.0), 1.0);
        assert_eq!(quantile_sorted(&x, 1.0), 4.0);
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn test_box_stats_flags_outliers() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let stats = BoxStats::from_values(&values).unwrap();
        assert_eq!(stats.n, 9);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.q3, 7.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.upper_whisker, 8.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.max, 100.0);
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(BoxStats::from_values(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = histogram(&values, sturges_bins(values.len()));
        assert_eq!(bins.len(), 8);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[bins.len() - 1].upper, 99.0);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[3.0, 3.0, 3.0], 5);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }
}
