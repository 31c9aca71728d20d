//! Ordinary least squares trend fitting.

use clima_utils::math;
use serde::{Deserialize, Serialize};

/// Fewest paired, finite points a regression will be fitted on.
///
/// Two points define a line; anything less yields [`RegressionModel::degenerate`].
pub const MIN_REGRESSION_SAMPLES: usize = 2;

/// A fitted line `y = slope * x + intercept`.
///
/// `r_squared` is the share of variance in `y` explained by the line, in
/// `[0, 1]`. `slope_per_decade` is `slope * 10`, meaningful when `x` is a
/// calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub slope_per_decade: f64,
}

impl RegressionModel {
    /// Flat line at the mean of the finite `ys` (0 when there are none).
    pub fn degenerate(ys: &[f64]) -> Self {
        RegressionModel {
            slope: 0.0,
            intercept: math::mean(ys).unwrap_or(0.0),
            r_squared: 0.0,
            slope_per_decade: 0.0,
        }
    }

    pub fn predict_one(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Evaluate the line at each `x`, historical or future.
    pub fn predict(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict_one(x)).collect()
    }
}

/// Fit `ys` against `xs` by ordinary least squares.
///
/// Pairs where either side is non-finite are dropped. Mismatched lengths,
/// fewer than [`MIN_REGRESSION_SAMPLES`] usable pairs, or constant `xs`
/// give [`RegressionModel::degenerate`] instead of an error.
pub fn fit(xs: &[f64], ys: &[f64]) -> RegressionModel {
    if xs.len() != ys.len() {
        log::debug!(
            "regression: length mismatch ({} xs, {} ys), returning flat model",
            xs.len(),
            ys.len()
        );
        return RegressionModel::degenerate(ys);
    }

    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pairs.len() < MIN_REGRESSION_SAMPLES {
        log::debug!(
            "regression: {} usable points, need {}",
            pairs.len(),
            MIN_REGRESSION_SAMPLES
        );
        return RegressionModel::degenerate(ys);
    }

    let first_x = pairs[0].0;
    if pairs.iter().all(|&(x, _)| x == first_x) {
        log::debug!("regression: zero variance in x");
        return RegressionModel::degenerate(ys);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let r_squared = if syy > 0.0 {
        let ss_res: f64 = pairs
            .iter()
            .map(|&(x, y)| {
                let r = y - (slope * x + intercept);
                r * r
            })
            .sum();
        math::clamp(1.0 - ss_res / syy, 0.0, 1.0)
    } else {
        0.0
    };

    RegressionModel {
        slope,
        intercept,
        r_squared,
        slope_per_decade: slope * 10.0,
    }
}
