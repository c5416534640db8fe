//! Trailing-window statistics over float series.
//!
//! Both functions share the same window policy: a value is produced at
//! index i only when i >= window-1 and every value in `[i-window+1, i]` is
//! defined. Anything else is the unknown marker (NaN). Windows longer than
//! the series yield an all-unknown result.

/// Rolling arithmetic mean.
///
/// First defined value lands at index window-1.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = slice.iter().sum::<f64>() / window as f64;
    }

    result
}

/// Rolling sample standard deviation (n-1 denominator).
///
/// A window of 1 has no sample variance and yields all-unknown.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window < 2 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let sum_sq: f64 = slice.iter().map(|v| (v - mean) * (v - mean)).sum();
        result[i] = (sum_sq / (window - 1) as f64).sqrt();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn mean_basic() {
        let result = rolling_mean(&[10.0, 11.0, 12.0, 13.0], 2);
        assert!(result[0].is_nan());
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.5, DEFAULT_EPSILON);
        assert_approx(result[3], 12.5, DEFAULT_EPSILON);
    }

    #[test]
    fn mean_window_1_is_identity() {
        let result = rolling_mean(&[5.0, 6.0], 1);
        assert_approx(result[0], 5.0, DEFAULT_EPSILON);
        assert_approx(result[1], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn mean_nan_in_window_propagates() {
        let result = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan()); // window [1, NaN]
        assert!(result[2].is_nan()); // window [NaN, 3]
        assert_approx(result[3], 3.5, DEFAULT_EPSILON);
        assert_approx(result[4], 4.5, DEFAULT_EPSILON);
    }

    #[test]
    fn mean_window_longer_than_series_is_all_unknown() {
        let result = rolling_mean(&[1.0, 2.0], 5);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn std_is_sample_std() {
        // [1, 2, 3]: mean 2, squared deviations 1+0+1, sample variance 1.
        let result = rolling_std(&[1.0, 2.0, 3.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_constant_series_is_zero() {
        let result = rolling_std(&[4.0, 4.0, 4.0, 4.0], 3);
        assert_approx(result[2], 0.0, DEFAULT_EPSILON);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_window_1_is_all_unknown() {
        let result = rolling_std(&[1.0, 2.0, 3.0], 1);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn std_nan_in_window_propagates() {
        let result = rolling_std(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0], 3);
        for i in 0..5 {
            assert!(result[i].is_nan(), "expected NaN at index {i}");
        }
        // Window [4, 5, 6]: sample std = 1.
        assert_approx(result[5], 1.0, DEFAULT_EPSILON);
    }
}
