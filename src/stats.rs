use std::cmp::Ordering;

/// Descriptive statistics for one numeric attribute of a reference set
///
/// Computed once per attribute and reused for every candidate comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub stddev: f64,
    pub q1: f64,
    pub q3: f64,
}

impl Summary {
    /// Returns true when `value` falls inside the closed [Q1, Q3] band
    pub fn in_iqr(&self, value: f64) -> bool {
        self.q1 <= value && value <= self.q3
    }

    /// Standard score of `value` against this distribution
    ///
    /// Callers must branch on `stddev == 0.0` before calling.
    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.stddev
    }
}

/// Computes mean, population standard deviation, and quartiles in one pass
///
/// `values` must be non-empty.
pub fn summarize(values: &[f64]) -> Summary {
    debug_assert!(!values.is_empty());
    let (q1, q3) = quartiles(values);
    Summary {
        mean: mean(values),
        stddev: stddev(values),
        q1,
        q3,
    }
}

/// Arithmetic mean of a non-empty slice
pub fn mean(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty());
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a non-empty slice
///
/// Divides by N rather than N-1: the reference set is treated as the whole
/// population, not a sample.
pub fn stddev(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty());
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// First and third quartiles of a non-empty slice
///
/// Uses linear interpolation between the two nearest ranks, so quartiles of
/// small sets land between observed values rather than snapping to them.
pub fn quartiles(values: &[f64]) -> (f64, f64) {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    (percentile(&sorted, 25.0), percentile(&sorted, 75.0))
}

/// Interpolated percentile over an already-sorted slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(mean(&[7.5]), 7.5);
    }

    #[test]
    fn test_stddev_is_population() {
        // Sample stddev of this set would be ~2.138; population is exactly 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(stddev(&values), 2.0);
    }

    #[test]
    fn test_stddev_identical_values_is_zero() {
        assert_eq!(stddev(&[2010.0, 2010.0, 2010.0]), 0.0);
    }

    #[test]
    fn test_quartiles_interpolate_between_ranks() {
        let years: Vec<f64> = (2000..=2007).map(|y| y as f64).collect();
        let (q1, q3) = quartiles(&years);
        assert_eq!(q1, 2001.75);
        assert_eq!(q3, 2005.25);
    }

    #[test]
    fn test_quartiles_single_value() {
        let (q1, q3) = quartiles(&[5.0]);
        assert_eq!(q1, 5.0);
        assert_eq!(q3, 5.0);
    }

    #[test]
    fn test_quartiles_input_order_irrelevant() {
        let (q1, q3) = quartiles(&[9.0, 1.0, 5.0, 3.0, 7.0]);
        assert_eq!(q1, 3.0);
        assert_eq!(q3, 7.0);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.stddev, 2.0);
        assert_eq!(summary.q1, 4.0);
        assert_eq!(summary.q3, 5.5);
    }

    #[test]
    fn test_in_iqr_bounds_are_inclusive() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(summary.in_iqr(summary.q1));
        assert!(summary.in_iqr(summary.q3));
        assert!(!summary.in_iqr(summary.q3 + 0.01));
    }

    #[test]
    fn test_z_score() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.z_score(7.0), 1.0);
        assert_eq!(summary.z_score(3.0), -1.0);
        assert_eq!(summary.z_score(5.0), 0.0);
    }
}
