//! Centered moving average.
//!
//! The window is truncated at both ends of the series rather than padded, so
//! the output always has the same length as the input and can be zipped
//! positionally against it.

use serde::{Deserialize, Serialize};

/// One smoothed position: the caller's index (usually a year) and the
/// average at that position, `None` when every entry in its window was
/// missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub index: i32,
    pub value: Option<f64>,
}

/// Centered moving average of `series` with a window of `window` total
/// width.
///
/// Each position averages the entries from `i - window/2` to `i + window/2`
/// that exist, so the first and last `window/2` outputs use fewer points.
/// An even `window` therefore spans `window + 1` entries. Missing entries
/// (`None` or non-finite) are left out of the average; a window with no
/// usable entry yields `None`. A `window` of 0 or 1 returns the input with
/// non-finite values mapped to `None`.
pub fn moving_average(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let half = window / 2;
    let mut result = Vec::with_capacity(n);

    for i in 0..n {
        let lo = i.saturating_sub(half);
        let hi = (i + half).min(n - 1);
        let (sum, count) = series[lo..=hi]
            .iter()
            .filter_map(|v| v.filter(|x| x.is_finite()))
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            result.push(None);
        } else {
            result.push(Some(sum / count as f64));
        }
    }

    result
}

/// Moving average over `(index, value)` pairs, keeping each index aligned
/// with its smoothed value.
pub fn smooth_series(points: &[(i32, f64)], window: usize) -> Vec<SmoothedPoint> {
    let values: Vec<Option<f64>> = points.iter().map(|&(_, v)| Some(v)).collect();
    moving_average(&values, window)
        .into_iter()
        .zip(points)
        .map(|(value, &(index, _))| SmoothedPoint { index, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn somes(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_constant_series_stays_constant() {
        let out = moving_average(&somes(&[5.0; 5]), 3);
        assert_eq!(out.len(), 5);
        for v in out {
            assert!((v.unwrap() - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_length_preserved_for_all_windows() {
        let input = somes(&[1.0, 4.0, 2.0, 8.0, 5.0, 7.0]);
        for window in 0..=input.len() {
            assert_eq!(moving_average(&input, window).len(), input.len());
        }
        assert!(moving_average(&[], 5).is_empty());
    }

    #[test]
    fn test_edges_use_truncated_window() {
        let out = moving_average(&somes(&[1.0, 2.0, 3.0, 4.0, 5.0]), 5);
        // first position averages [1, 2, 3], not padded zeros
        assert_eq!(out[0], Some(2.0));
        assert_eq!(out[1], Some(2.5));
        assert_eq!(out[2], Some(3.0));
        assert_eq!(out[3], Some(3.5));
        assert_eq!(out[4], Some(4.0));
    }

    #[test]
    fn test_missing_entries_are_excluded() {
        let input = vec![Some(2.0), None, Some(4.0), Some(f64::NAN), Some(6.0)];
        let out = moving_average(&input, 3);
        assert_eq!(out[0], Some(2.0));
        assert_eq!(out[1], Some(3.0));
        assert_eq!(out[2], Some(4.0));
        assert_eq!(out[3], Some(5.0));
        assert_eq!(out[4], Some(6.0));
    }

    #[test]
    fn test_all_missing_window_is_none() {
        let input = vec![None, None, None, Some(9.0)];
        let out = moving_average(&input, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(9.0));
    }

    #[test]
    fn test_window_one_is_identity() {
        let input = somes(&[3.0, 1.0, 2.0]);
        assert_eq!(moving_average(&input, 1), input);
    }

    #[test]
    fn test_smooth_series_keeps_indices() {
        let points = [(2000, 1.0), (2001, 3.0), (2002, 5.0)];
        let out = smooth_series(&points, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].index, 2000);
        assert_eq!(out[1], SmoothedPoint { index: 2001, value: Some(3.0) });
        assert_eq!(out[2].value, Some(4.0));
    }
}
