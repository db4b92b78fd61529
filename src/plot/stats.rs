//! Box-and-whisker statistics.

/// Percentile of sorted data with linear interpolation between ranks.
///
/// `p` is in percent. `sorted` must be non-empty and ascending.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = (p / 100.0).clamp(0.0, 1.0) * (n as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Everything needed to draw one box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub n: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    /// Lowest data point at or above the lower whisker percentile.
    pub whisker_low: f64,
    /// Highest data point at or below the upper whisker percentile.
    pub whisker_high: f64,
    /// Points outside the whiskers.
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// Compute stats with whiskers at the `whis` percentiles, e.g. `(2.5, 97.5)`.
    ///
    /// Returns `None` for empty input. Non-finite values must be filtered first.
    pub fn compute(values: &[f64], whis: (f64, f64)) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let lo_bound = percentile_sorted(&sorted, whis.0);
        let hi_bound = percentile_sorted(&sorted, whis.1);
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= lo_bound)
            .unwrap_or(sorted[0]);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= hi_bound)
            .unwrap_or(sorted[sorted.len() - 1]);

        let fliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(Self {
            n: sorted.len(),
            q1: percentile_sorted(&sorted, 25.0),
            median: percentile_sorted(&sorted, 50.0),
            q3: percentile_sorted(&sorted, 75.0),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            whisker_low,
            whisker_high,
            fliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&v, 0.0), 1.0);
        assert_eq!(percentile_sorted(&v, 50.0), 3.0);
        assert_eq!(percentile_sorted(&v, 100.0), 5.0);
        assert!((percentile_sorted(&v, 2.5) - 1.1).abs() < 1e-12);
        assert!((percentile_sorted(&[10.0, 20.0], 25.0) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn box_stats_of_ramp() {
        let values: Vec<f64> = (0..=40).map(f64::from).collect();
        let s = BoxStats::compute(&values, (2.5, 97.5)).unwrap();
        assert_eq!(s.n, 41);
        assert_eq!(s.median, 20.0);
        assert_eq!(s.q1, 10.0);
        assert_eq!(s.q3, 30.0);
        assert_eq!(s.mean, 20.0);
        // 2.5th percentile is exactly 1.0; the lowest point at or above it is 1.
        assert_eq!(s.whisker_low, 1.0);
        assert_eq!(s.whisker_high, 39.0);
        assert_eq!(s.fliers, vec![0.0, 40.0]);
    }

    #[test]
    fn single_value_box_collapses() {
        let s = BoxStats::compute(&[-7.0], (2.5, 97.5)).unwrap();
        assert_eq!((s.q1, s.median, s.q3), (-7.0, -7.0, -7.0));
        assert_eq!((s.whisker_low, s.whisker_high), (-7.0, -7.0));
        assert!(s.fliers.is_empty());
    }

    #[test]
    fn empty_input_has_no_box() {
        assert!(BoxStats::compute(&[], (2.5, 97.5)).is_none());
    }
}
