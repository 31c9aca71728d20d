//! Percentiles by linear interpolation between order statistics.
//!
//! Two forms are offered. [`percentile_opt`] returns `None` for an empty
//! sample. [`percentile`] keeps the chart-facing contract of returning
//! [`EMPTY_PERCENTILE`] (0) instead, which callers must not read as a real
//! zeroth-percentile value.

/// Returned by [`percentile`] when the sample has no finite values.
pub const EMPTY_PERCENTILE: f64 = 0.0;

fn sorted_finite(sample: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Percentile `p` of an already sorted, non-empty slice.
fn interpolate_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let p = clima_utils::math::clamp(p, 0.0, 100.0);
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 100.0 {
        return sorted[n - 1];
    }
    let idx = (p / 100.0) * (n - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    let frac = idx - lo as f64;
    if lo == hi || frac == 0.0 {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Percentile `p` (0..=100) of the finite values in `sample`.
///
/// `p` outside `[0, 100]` is clamped. Returns `None` for an empty sample or a
/// NaN `p`. `p = 0` is exactly the minimum and `p = 100` exactly the maximum.
pub fn percentile_opt(sample: &[f64], p: f64) -> Option<f64> {
    if p.is_nan() {
        return None;
    }
    let sorted = sorted_finite(sample);
    if sorted.is_empty() {
        return None;
    }
    Some(interpolate_sorted(&sorted, p))
}

/// Percentile `p` of `sample`, or [`EMPTY_PERCENTILE`] for an empty sample.
pub fn percentile(sample: &[f64], p: f64) -> f64 {
    percentile_opt(sample, p).unwrap_or(EMPTY_PERCENTILE)
}

/// Several percentiles from a single sort. Each entry is `None` under the
/// same conditions as [`percentile_opt`].
pub fn percentiles(sample: &[f64], ps: &[f64]) -> Vec<Option<f64>> {
    let sorted = sorted_finite(sample);
    ps.iter()
        .map(|&p| {
            if sorted.is_empty() || p.is_nan() {
                None
            } else {
                Some(interpolate_sorted(&sorted, p))
            }
        })
        .collect()
}
