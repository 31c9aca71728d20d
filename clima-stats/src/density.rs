//! Kernel density estimation.
//!
//! Two estimators are kept separate on purpose:
//!
//! * [`gaussian_kde`]: Gaussian kernel, rule-of-thumb bandwidth unless
//!   overridden, evaluated on an evenly spaced grid. Used for a single
//!   sample's distribution.
//! * [`epanechnikov_kde`]: compact quadratic kernel with a caller-chosen
//!   bandwidth evaluated at caller-chosen points. Used when several series
//!   are overlaid on one shared x-axis.
//!
//! Both return an empty curve for an empty sample and never produce a
//! negative density. The curves approximate unit area; discretisation means
//! they need not integrate to exactly 1.

use clima_utils::math;
use serde::{Deserialize, Serialize};

/// Square root of 2*pi, the Gaussian normalising constant.
const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Scale factor of the normal-reference bandwidth rule.
const BANDWIDTH_RULE_FACTOR: f64 = 1.06;

/// Bandwidth used when the rule of thumb collapses (single point, constant
/// sample).
pub const FALLBACK_BANDWIDTH: f64 = 1.0;

/// Default number of evaluation points for [`gaussian_kde`].
pub const DEFAULT_KDE_POINTS: usize = 100;

/// One point of a density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// Options for [`gaussian_kde`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKdeOptions {
    /// Explicit bandwidth; the rule of thumb is used when `None`.
    pub bandwidth: Option<f64>,
    /// Explicit `(min, max)` evaluation domain; when `None` the sample range
    /// widened by two bandwidths on each side.
    pub domain: Option<(f64, f64)>,
    /// Number of evenly spaced evaluation points.
    pub points: usize,
}

impl Default for GaussianKdeOptions {
    fn default() -> Self {
        GaussianKdeOptions {
            bandwidth: None,
            domain: None,
            points: DEFAULT_KDE_POINTS,
        }
    }
}

/// Normal-reference bandwidth `1.06 * sd * n^(-1/5)`.
///
/// Falls back to [`FALLBACK_BANDWIDTH`] when the sample has fewer than two
/// finite values or zero spread.
pub fn rule_of_thumb_bandwidth(sample: &[f64]) -> f64 {
    let n = math::finite(sample).count();
    match math::std_dev(sample) {
        Some(sd) if sd > 0.0 => BANDWIDTH_RULE_FACTOR * sd * (n as f64).powf(-0.2),
        _ => FALLBACK_BANDWIDTH,
    }
}

/// `points` evenly spaced values from `lo` to `hi`, both ends included.
pub fn evenly_spaced(lo: f64, hi: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (points - 1) as f64;
            (0..points)
                .map(|i| if i == points - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Gaussian kernel density estimate of `sample`.
///
/// Density at `x` is `sum(exp(-u^2 / 2)) / (n * h * sqrt(2*pi))` with
/// `u = (x - x_i) / h`.
pub fn gaussian_kde(sample: &[f64], options: GaussianKdeOptions) -> Vec<DensityPoint> {
    let data: Vec<f64> = math::finite(sample).collect();
    if data.is_empty() {
        return Vec::new();
    }

    let h = match options.bandwidth {
        Some(bw) if bw.is_finite() && bw > 0.0 => bw,
        Some(bw) => {
            log::warn!("gaussian kde: ignoring invalid bandwidth {bw}");
            rule_of_thumb_bandwidth(&data)
        }
        None => rule_of_thumb_bandwidth(&data),
    };

    let (lo, hi) = match options.domain {
        Some((a, b)) if a.is_finite() && b.is_finite() => {
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        }
        _ => {
            let min = data.iter().copied().fold(f64::INFINITY, f64::min);
            let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min - 2.0 * h, max + 2.0 * h)
        }
    };

    let norm = data.len() as f64 * h * SQRT_2PI;
    evenly_spaced(lo, hi, options.points)
        .into_iter()
        .map(|x| {
            let sum: f64 = data
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / h;
                    (-0.5 * u * u).exp()
                })
                .sum();
            DensityPoint {
                x,
                density: (sum / norm).max(0.0),
            }
        })
        .collect()
}

/// Compact-support (Epanechnikov) density estimate of `sample` at each of
/// `xs`, with fixed `bandwidth`.
///
/// The kernel is `0.75 * (1 - u^2)` for `|u| <= 1` and zero beyond, so only
/// points within one bandwidth contribute. Normalised by `n * h`. An empty
/// sample or a non-positive bandwidth yields an empty curve.
pub fn epanechnikov_kde(sample: &[f64], bandwidth: f64, xs: &[f64]) -> Vec<DensityPoint> {
    let data: Vec<f64> = math::finite(sample).collect();
    if data.is_empty() {
        return Vec::new();
    }
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        log::warn!("epanechnikov kde: invalid bandwidth {bandwidth}");
        return Vec::new();
    }

    let norm = data.len() as f64 * bandwidth;
    xs.iter()
        .map(|&x| {
            let sum: f64 = data
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / bandwidth;
                    if u.abs() <= 1.0 {
                        0.75 * (1.0 - u * u)
                    } else {
                        0.0
                    }
                })
                .sum();
            DensityPoint {
                x,
                density: (sum / norm).max(0.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trapezoid-rule area under a density curve.
    fn area(curve: &[DensityPoint]) -> f64 {
        curve
            .windows(2)
            .map(|w| (w[1].x - w[0].x) * (w[0].density + w[1].density) / 2.0)
            .sum()
    }

    fn sample() -> Vec<f64> {
        vec![22.1, 24.5, 25.0, 25.3, 26.8, 27.2, 28.0, 29.9, 31.4, 33.0]
    }

    #[test]
    fn test_empty_sample_gives_empty_curve() {
        assert!(gaussian_kde(&[], GaussianKdeOptions::default()).is_empty());
        assert!(epanechnikov_kde(&[], 1.0, &[0.0, 1.0]).is_empty());
        assert!(gaussian_kde(&[f64::NAN], GaussianKdeOptions::default()).is_empty());
    }

    #[test]
    fn test_gaussian_grid_and_domain() {
        let s = sample();
        let h = rule_of_thumb_bandwidth(&s);
        let curve = gaussian_kde(&s, GaussianKdeOptions::default());
        assert_eq!(curve.len(), DEFAULT_KDE_POINTS);
        assert!((curve[0].x - (22.1 - 2.0 * h)).abs() < 1e-9);
        assert!((curve[curve.len() - 1].x - (33.0 + 2.0 * h)).abs() < 1e-9);
        assert!(curve.iter().all(|p| p.density >= 0.0));
    }

    #[test]
    fn test_gaussian_approximates_unit_area() {
        let s = sample();
        let curve = gaussian_kde(
            &s,
            GaussianKdeOptions {
                domain: Some((0.0, 60.0)),
                points: 2000,
                ..Default::default()
            },
        );
        assert!((area(&curve) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_gaussian_single_point_peak() {
        let curve = gaussian_kde(
            &[5.0],
            GaussianKdeOptions {
                bandwidth: Some(2.0),
                domain: Some((5.0, 5.0)),
                points: 1,
            },
        );
        assert_eq!(curve.len(), 1);
        assert!((curve[0].density - 1.0 / (2.0 * SQRT_2PI)).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_invalid_bandwidth_uses_rule() {
        let s = sample();
        let auto = gaussian_kde(&s, GaussianKdeOptions::default());
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let curve = gaussian_kde(
                &s,
                GaussianKdeOptions {
                    bandwidth: Some(bad),
                    ..Default::default()
                },
            );
            assert_eq!(curve, auto);
        }
    }

    #[test]
    fn test_rule_of_thumb_fallback() {
        assert_eq!(rule_of_thumb_bandwidth(&[3.0]), FALLBACK_BANDWIDTH);
        assert_eq!(rule_of_thumb_bandwidth(&[3.0, 3.0, 3.0]), FALLBACK_BANDWIDTH);
        let h = rule_of_thumb_bandwidth(&sample());
        assert!(h > 0.0);
    }

    #[test]
    fn test_epanechnikov_compact_support() {
        let curve = epanechnikov_kde(&[0.0], 1.0, &[-2.0, -1.0, 0.0, 0.5, 1.5]);
        assert_eq!(curve.len(), 5);
        assert_eq!(curve[0].density, 0.0);
        assert_eq!(curve[1].density, 0.0);
        assert!((curve[2].density - 0.75).abs() < 1e-12);
        assert!((curve[3].density - 0.5625).abs() < 1e-12);
        assert_eq!(curve[4].density, 0.0);
    }

    #[test]
    fn test_epanechnikov_unit_area() {
        let xs: Vec<f64> = (0..=4000).map(|i| 10.0 + i as f64 * 0.01).collect();
        let curve = epanechnikov_kde(&sample(), 2.5, &xs);
        assert!((area(&curve) - 1.0).abs() < 1e-3);
        assert!(curve.iter().all(|p| p.density >= 0.0));
    }

    #[test]
    fn test_epanechnikov_invalid_bandwidth() {
        assert!(epanechnikov_kde(&sample(), 0.0, &[25.0]).is_empty());
        assert!(epanechnikov_kde(&sample(), -1.0, &[25.0]).is_empty());
    }
}
